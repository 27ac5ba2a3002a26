//! Cache module - Redis connection management
//!
//! Provides the multiplexed Redis connection used by the Redis document
//! store, with connect retries and server clock access.

pub mod redis_client;


// Re-export commonly used types
pub use redis_client::RedisClient;
