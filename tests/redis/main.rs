mod concurrent_blpop;
