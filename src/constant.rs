// Handshake bytes sent by the device
pub const NEW_MESSAGE: u8 = b'n';
pub const NEXT_CHUNK: u8 = b'g';

// Written instead of a chunk when a send fails
pub const ABORT_BYTE: u8 = b'\0';

pub const MESSAGE_SENTINEL: char = '@';
pub const MESSAGE_TERMINATOR: char = '\n';

pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyACM0";
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_REFRESH_THRESHOLD: u64 = 100;
// Stays under the device's 128 byte serial buffer
pub const DEFAULT_CHUNK_SIZE: usize = 72;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_REPLACEMENTS: [(&str, &str); 4] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("http://", ""),
];
