use std::{
    collections::{HashMap, VecDeque},
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use thiserror::Error;

/// Milliseconds since the Unix epoch, the clock used for expiry and stream ids.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("The ID specified in XADD must be greater than 0-0")]
    StreamIdZero,
    #[error("The ID specified in XADD is equal or smaller than the target stream top item")]
    StreamIdTooSmall,
    #[error("Invalid stream ID specified as stream command argument")]
    InvalidStreamId,
    #[error("value is not an integer or out of range")]
    NotAnInteger,
}

/// Identifier of a stream entry, ordered by `millis` first and `sequence` second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId {
    pub millis: u64,
    pub sequence: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId {
        millis: 0,
        sequence: 0,
    };
    pub const MAX: StreamId = StreamId {
        millis: u64::MAX,
        sequence: u64::MAX,
    };

    pub fn new(millis: u64, sequence: u64) -> Self {
        Self { millis, sequence }
    }

    /// Parses `<millis>-<sequence>` or a bare `<millis>`, in which case the
    /// sequence is `default_sequence`.
    pub fn parse_with_default_sequence(input: &str, default_sequence: u64) -> Option<Self> {
        match input.split_once('-') {
            Some((millis, sequence)) => Some(Self {
                millis: parse_id_part(millis)?,
                sequence: parse_id_part(sequence)?,
            }),
            None => Some(Self {
                millis: parse_id_part(input)?,
                sequence: default_sequence,
            }),
        }
    }
}

/// Digits only: no sign, no whitespace.
fn parse_id_part(input: &str) -> Option<u64> {
    if input.is_empty() || !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    input.parse().ok()
}

/// Parses a base-10 `i64` the way Redis does, which unlike [`str::parse`]
/// rejects a leading `+`.
pub fn parse_i64(input: &[u8]) -> Option<i64> {
    if input.first() == Some(&b'+') {
        return None;
    }

    std::str::from_utf8(input).ok()?.parse().ok()
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.millis, self.sequence)
    }
}

impl FromStr for StreamId {
    type Err = StoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse_with_default_sequence(input, 0).ok_or(StoreError::InvalidStreamId)
    }
}

/// The id argument of XADD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamIdRequest {
    /// `*`: both parts chosen by the server.
    Auto,
    /// `<millis>-*`: the server picks the sequence.
    AutoSequence(u64),
    Explicit(StreamId),
}

impl StreamIdRequest {
    pub fn parse(input: &[u8]) -> Result<Self, StoreError> {
        let input = std::str::from_utf8(input).map_err(|_| StoreError::InvalidStreamId)?;

        if input == "*" {
            return Ok(StreamIdRequest::Auto);
        }

        if let Some(millis) = input.strip_suffix("-*") {
            let millis = parse_id_part(millis).ok_or(StoreError::InvalidStreamId)?;
            return Ok(StreamIdRequest::AutoSequence(millis));
        }

        input.parse().map(StreamIdRequest::Explicit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub id: StreamId,
    /// Field/value pairs in the order they were given.
    pub fields: Vec<(Bytes, Bytes)>,
}

/// An append-only log whose entry ids are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stream {
    entries: Vec<StreamEntry>,
}

impl Stream {
    pub fn last_id(&self) -> Option<StreamId> {
        self.entries.last().map(|entry| entry.id)
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[StreamEntry] {
        &self.entries
    }

    /// Entries whose id lies in `start..=end`.
    pub fn range(&self, start: StreamId, end: StreamId) -> &[StreamEntry] {
        let lower = self.entries.partition_point(|entry| entry.id < start);
        let upper = self.entries.partition_point(|entry| entry.id <= end);

        if lower >= upper {
            return &[];
        }

        &self.entries[lower..upper]
    }

    /// Resolves the id the next appended entry gets, rejecting ids that
    /// would not be strictly greater than the current top item.
    pub fn next_id(&self, request: StreamIdRequest, now: u64) -> Result<StreamId, StoreError> {
        let last = self.last_id();

        match request {
            StreamIdRequest::Explicit(id) => {
                if id == StreamId::MIN {
                    return Err(StoreError::StreamIdZero);
                }

                match last {
                    Some(last) if id <= last => Err(StoreError::StreamIdTooSmall),
                    _ => Ok(id),
                }
            }
            StreamIdRequest::AutoSequence(millis) => match last {
                Some(last) if last.millis > millis => Err(StoreError::StreamIdTooSmall),
                Some(last) if last.millis == millis => last
                    .sequence
                    .checked_add(1)
                    .map(|sequence| StreamId::new(millis, sequence))
                    .ok_or(StoreError::StreamIdTooSmall),
                _ => Ok(StreamId::new(millis, if millis == 0 { 1 } else { 0 })),
            },
            StreamIdRequest::Auto => match last {
                // The clock went backwards or did not move: stay on the last millis.
                Some(last) if last.millis >= now => last
                    .sequence
                    .checked_add(1)
                    .map(|sequence| StreamId::new(last.millis, sequence))
                    .ok_or(StoreError::StreamIdTooSmall),
                _ => Ok(StreamId::new(now, if now == 0 { 1 } else { 0 })),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(Bytes),
    List(VecDeque<Bytes>),
    Stream(Stream),
}

impl DataType {
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::List(_) => "list",
            DataType::Stream(_) => "stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: DataType,
    /// Absolute expiry in milliseconds since the Unix epoch.
    pub expiration: Option<u64>,
}

impl Value {
    pub fn new(data: DataType) -> Self {
        Self {
            data,
            expiration: None,
        }
    }

    pub fn with_expiration(data: DataType, expiration: Option<u64>) -> Self {
        Self { data, expiration }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.expiration, Some(expiration) if now >= expiration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListEnd {
    Head,
    Tail,
}

/// The keyspace. Expired entries are removed lazily: every operation that
/// looks at a key first drops it if its expiry has passed.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: HashMap<Bytes, Value>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(&mut self, key: &[u8]) {
        let now = now_millis();

        if self
            .entries
            .get(key)
            .is_some_and(|value| value.is_expired(now))
        {
            self.entries.remove(key);
        }
    }

    pub fn get(&mut self, key: &[u8]) -> Option<&Value> {
        self.purge_expired(key);
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut Value> {
        self.purge_expired(key);
        self.entries.get_mut(key)
    }

    /// Stores `value` under `key`, replacing whatever was there, whatever its type.
    pub fn set(&mut self, key: Bytes, value: Value) {
        self.entries.insert(key, value);
    }

    /// Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        self.purge_expired(key);
        self.entries.remove(key).is_some()
    }

    /// Number of stored entries, including expired ones nobody has looked at yet.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn type_of(&mut self, key: &[u8]) -> &'static str {
        self.get(key)
            .map(|value| value.data.type_name())
            .unwrap_or("none")
    }

    pub fn get_string(&mut self, key: &[u8]) -> Result<Option<Bytes>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::String(data),
                ..
            }) => Ok(Some(data.clone())),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Runs `operation` against the list at `key`.
    ///
    /// Returns `Ok(None)` when the key does not exist. A list left empty by
    /// `operation` is removed from the keyspace.
    pub fn mutate_list<F, R>(&mut self, key: &[u8], operation: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut VecDeque<Bytes>) -> R,
    {
        let Some(value) = self.get_mut(key) else {
            return Ok(None);
        };

        let DataType::List(list) = &mut value.data else {
            return Err(StoreError::WrongType);
        };

        let result = operation(list);

        if list.is_empty() {
            self.entries.remove(key);
        }

        Ok(Some(result))
    }

    /// Pushes `values` one at a time onto the given end of the list at `key`,
    /// creating the list if needed. Returns the resulting length.
    pub fn push(&mut self, key: Bytes, values: Vec<Bytes>, end: ListEnd) -> Result<usize, StoreError> {
        if values.is_empty() {
            return self.list_len(&key);
        }

        self.purge_expired(&key);

        let value = self
            .entries
            .entry(key)
            .or_insert_with(|| Value::new(DataType::List(VecDeque::new())));

        let DataType::List(list) = &mut value.data else {
            return Err(StoreError::WrongType);
        };

        for element in values {
            match end {
                ListEnd::Head => list.push_front(element),
                ListEnd::Tail => list.push_back(element),
            }
        }

        Ok(list.len())
    }

    pub fn pop_front(&mut self, key: &[u8]) -> Result<Option<Bytes>, StoreError> {
        self.mutate_list(key, |list| list.pop_front())
            .map(Option::flatten)
    }

    /// Pops up to `count` elements from the head, in head-to-tail order.
    pub fn pop_front_many(&mut self, key: &[u8], count: usize) -> Result<Vec<Bytes>, StoreError> {
        self.mutate_list(key, |list| {
            let count = count.min(list.len());
            list.drain(..count).collect()
        })
        .map(Option::unwrap_or_default)
    }

    pub fn list_len(&mut self, key: &[u8]) -> Result<usize, StoreError> {
        match self.get(key) {
            None => Ok(0),
            Some(Value {
                data: DataType::List(list),
                ..
            }) => Ok(list.len()),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    pub fn list_range(&mut self, key: &[u8], start: i64, stop: i64) -> Result<Vec<Bytes>, StoreError> {
        let list = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(Value {
                data: DataType::List(list),
                ..
            }) => list,
            Some(_) => return Err(StoreError::WrongType),
        };

        let Some((start, stop)) = normalize_range(list.len(), start, stop) else {
            return Ok(Vec::new());
        };

        Ok(list.range(start..=stop).cloned().collect())
    }

    /// Appends an entry to the stream at `key`, creating the stream if needed.
    /// Nothing is stored when the id is rejected.
    pub fn append_stream(
        &mut self,
        key: Bytes,
        request: StreamIdRequest,
        fields: Vec<(Bytes, Bytes)>,
    ) -> Result<StreamId, StoreError> {
        let now = now_millis();

        match self.get_mut(&key) {
            Some(value) => {
                let DataType::Stream(stream) = &mut value.data else {
                    return Err(StoreError::WrongType);
                };

                let id = stream.next_id(request, now)?;
                stream.entries.push(StreamEntry { id, fields });
                Ok(id)
            }
            None => {
                let mut stream = Stream::default();
                let id = stream.next_id(request, now)?;
                stream.entries.push(StreamEntry { id, fields });

                self.entries.insert(key, Value::new(DataType::Stream(stream)));
                Ok(id)
            }
        }
    }

    pub fn stream(&mut self, key: &[u8]) -> Result<Option<&Stream>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::Stream(stream),
                ..
            }) => Ok(Some(stream)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Adds one to the integer held at `key`, keeping its expiry. A missing key
    /// counts as `0`.
    pub fn increment(&mut self, key: Bytes) -> Result<i64, StoreError> {
        let Some(value) = self.get_mut(&key) else {
            self.entries
                .insert(key, Value::new(DataType::String(Bytes::from_static(b"1"))));
            return Ok(1);
        };

        let DataType::String(data) = &mut value.data else {
            return Err(StoreError::WrongType);
        };

        let current = parse_i64(data).ok_or(StoreError::NotAnInteger)?;

        let incremented = current.checked_add(1).ok_or(StoreError::NotAnInteger)?;
        *data = Bytes::from(incremented.to_string());

        Ok(incremented)
    }
}

/// Converts LRANGE-style indices into an inclusive `(start, stop)` pair of
/// positions inside a list of length `len`.
///
/// Negative indices count from the tail (`-1` is the last element). Returns
/// `None` when the normalized range selects nothing.
///
/// ```text
/// normalize_range(5, 0, 2)   -> Some((0, 2))
/// normalize_range(5, -2, -1) -> Some((3, 4))
/// normalize_range(5, 5, 10)  -> None
/// ```
pub fn normalize_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }

    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return None;
    }

    Some((start as usize, stop as usize))
}
