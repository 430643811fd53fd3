/// Envelope handed over by the sensor middleware for every delivered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokeMessage {
    /// Message type identifier; radar spokes use the configured id.
    pub message_id: u32,
    /// Sensor instance that produced the record.
    pub sender_stamp: u32,
    /// Encoded spoke record.
    pub payload: Vec<u8>,
}

impl SpokeMessage {
    pub fn new(message_id: u32, sender_stamp: u32, payload: Vec<u8>) -> Self {
        Self {
            message_id,
            sender_stamp,
            payload,
        }
    }
}
