use crate::{key_value_store::StreamEntry, resp::RespValue};

/// Converts stream entries to RESP array format.
///
/// Each entry becomes a 2-element array: `[stream_id, [field1, value1, field2, value2, ...]]`,
/// with fields in the order they were added.
///
/// # Examples
///
/// ```text
/// // entries 1234-0 {temp: 25} and 1235-0 {temp: 26} encode as:
/// // "*2\r\n*2\r\n$6\r\n1234-0\r\n*2\r\n$4\r\ntemp\r\n$2\r\n25\r\n*2\r\n$6\r\n1235-0\r\n*2\r\n$4\r\ntemp\r\n$2\r\n26\r\n"
/// ```
pub fn stream_entries_to_resp(entries: &[StreamEntry]) -> RespValue {
    let response = entries
        .iter()
        .map(|entry| {
            let fields = entry
                .fields
                .iter()
                .flat_map(|(field, value)| [field.clone(), value.clone()]);

            RespValue::Array(vec![
                RespValue::bulk_string(entry.id.to_string()),
                RespValue::bulk_string_array(fields),
            ])
        })
        .collect();

    RespValue::Array(response)
}
