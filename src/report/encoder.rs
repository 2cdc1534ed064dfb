//! # Report Frame Encoder
//!
//! Encodes XUSB gamepad reports into bridge frames.

use bytes::{BufMut, Bytes, BytesMut};

use super::crc::crc8;
use super::protocol::*;

/// Encode a report into a complete bridge frame
///
/// # Arguments
///
/// * `report` - Gamepad report to send
///
/// # Returns
///
/// * `Bytes` - Complete frame (16 bytes: sync + length + type + 12-byte payload + crc)
///
/// # Examples
///
/// ```
/// use pad_mapper::report::encoder::encode_report_frame;
/// use pad_mapper::report::protocol::XusbReport;
///
/// let frame = encode_report_frame(&XusbReport::default());
/// assert_eq!(frame.len(), 16);
/// assert_eq!(frame[0], 0xA5);
/// ```
pub fn encode_report_frame(report: &XusbReport) -> Bytes {
    let mut frame = BytesMut::with_capacity(XUSB_FRAME_SIZE);
    frame.put_u8(FRAME_SYNC_BYTE);
    frame.put_u8(XUSB_FRAME_LENGTH);
    frame.put_u8(FRAME_TYPE_XUSB_REPORT);
    frame.put_slice(&encode_report_payload(report));

    // CRC over Length + Type + Payload
    let crc = crc8(&frame[1..]);
    frame.put_u8(crc);

    frame.freeze()
}

/// Encode a report into its 12-byte little-endian payload
///
/// ```text
/// Byte 0-1:  buttons
/// Byte 2:    left trigger
/// Byte 3:    right trigger
/// Byte 4-11: thumb LX, LY, RX, RY (i16 each)
/// ```
pub fn encode_report_payload(report: &XusbReport) -> [u8; XUSB_REPORT_SIZE] {
    let mut payload = [0u8; XUSB_REPORT_SIZE];
    {
        let mut buf = &mut payload[..];
        buf.put_u16_le(report.buttons);
        buf.put_u8(report.left_trigger);
        buf.put_u8(report.right_trigger);
        buf.put_i16_le(report.thumb_lx);
        buf.put_i16_le(report.thumb_ly);
        buf.put_i16_le(report.thumb_rx);
        buf.put_i16_le(report.thumb_ry);
    }
    payload
}
