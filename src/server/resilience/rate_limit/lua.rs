//! Lua scripts for the Valkey/Redis sliding-window rate limiter

// Lua script to atomically evaluate and record a request in a sliding window
// Each request is a ZSET member scored with its timestamp in milliseconds
//
// KEYS[1]: sorted set key of the identifier
// ARGV[1]: current timestamp (ms)
// ARGV[2]: window size (ms)
// ARGV[3]: effective request limit
// ARGV[4]: unique member for this request
//
// Returns: { allowed (1/0), requests in window, oldest timestamp in window }
pub static SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])
local member = ARGV[4]

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)

local count = redis.call('ZCARD', key)
local allowed = 0
if count < limit then
    redis.call('ZADD', key, now, member)
    count = count + 1
    allowed = 1
end
redis.call('PEXPIRE', key, window)

local oldest = now
local first = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
if first[2] then
    oldest = tonumber(first[2])
end

return { allowed, count, oldest }
"#;

// Lua script to record a violation and return the violation count of the last period
//
// KEYS[1]: sorted set key of the identifier's violations
// ARGV[1]: current timestamp (ms)
// ARGV[2]: tracking period (ms)
// ARGV[3]: unique member for this violation
//
// Returns: number of violations within the period, including this one
pub static RECORD_VIOLATION_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local period = tonumber(ARGV[2])

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - period)
redis.call('ZADD', key, now, ARGV[3])
redis.call('PEXPIRE', key, period)

return redis.call('ZCARD', key)
"#;

// Lua script to count violations within the tracking period
//
// KEYS[1]: sorted set key of the identifier's violations
// ARGV[1]: current timestamp (ms)
// ARGV[2]: tracking period (ms)
//
// Returns: number of violations within the period
pub static COUNT_VIOLATIONS_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local period = tonumber(ARGV[2])

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - period)

return redis.call('ZCARD', key)
"#;
