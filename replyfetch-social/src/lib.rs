//! Social network clients used by replyfetch.
//!
//! Only the Twitter/X replies endpoint is implemented: one request per call,
//! normalized into flat [`twitter::ReplyRecord`]s.
pub mod twitter;
