// Protocol constants for the Accessory Protocol

/// Magic bytes that open every frame, in both directions
pub const HEADER: [u8; 2] = [0xFF, 0x55];

/// Size of the frame header (2 bytes)
pub const HEADER_SIZE: usize = 2;

/// Size of the trailing checksum (1 byte)
pub const CHECKSUM_SIZE: usize = 1;

/// Size of the mode field (1 byte)
pub const MODE_SIZE: usize = 1;

/// Length byte that announces the 3-byte extended length form
pub const EXTENDED_LENGTH_MARKER: u8 = 0x00;

/// Lengths at or above this value use the extended form
pub const EXTENDED_LENGTH_THRESHOLD: usize = 255;

/// Size of the length field in its short form
pub const SHORT_LENGTH_SIZE: usize = 1;

/// Size of the length field in its extended form (marker + u16)
pub const EXTENDED_LENGTH_SIZE: usize = 3;

/// Width of the command field in device responses
pub const RESPONSE_COMMAND_SIZE: usize = 2;

/// Largest length the extended form can carry
pub const MAX_PACKET_LENGTH: usize = u16::MAX as usize;

/// Minimum size of a complete frame: header, length, mode, checksum
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + SHORT_LENGTH_SIZE + MODE_SIZE + CHECKSUM_SIZE;

/// Baud rate of the reference serial configuration (8N1)
pub const REFERENCE_BAUD_RATE: u32 = 19_200;

/// Command byte of the Advanced-mode acknowledgement response
pub const ACK_COMMAND: [u8; 2] = [0x00, 0x01];

/// Acknowledgement status reported for a successful command
pub const ACK_SUCCESS: u8 = 0x00;

/// Song number sent with a playlist switch to start at the beginning
pub const PLAYLIST_START: u32 = 0xFFFF_FFFF;
