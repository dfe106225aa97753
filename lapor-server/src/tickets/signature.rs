//! Signature gate
//!
//! Every status change must carry a captured signature. The artifact has to
//! decode to an image with at least one stroke on it; an untouched canvas is
//! treated as no signature at all.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageReader, Limits};
use shared::ticket::{Attachment, AttachmentError, AttachmentKind};

use super::error::{TicketError, TicketResult};
use crate::utils::validation::validate_attachment;

/// Widest or tallest canvas accepted from a signature pad
pub const MAX_SIGNATURE_DIMENSION: u32 = 4096;

/// Decoder allocation ceiling for one signature
const MAX_SIGNATURE_ALLOC: u64 = 64 * 1024 * 1024;

/// Decode and check a signature, returning the attachment to store on the
/// action entry.
pub fn verify_signature(encoded: &str) -> TicketResult<Attachment> {
    let attachment =
        Attachment::decode(AttachmentKind::Signature, encoded).map_err(|e| match e {
            AttachmentError::Empty => TicketError::MissingSignature("signature is empty".into()),
            AttachmentError::InvalidEncoding(msg) => {
                TicketError::MissingSignature(format!("signature is not decodable: {msg}"))
            }
        })?;

    check_signature(attachment)
}

/// Check an already decoded signature artifact. The stored mime type is the
/// sniffed one, whatever the client declared.
pub fn check_signature(mut attachment: Attachment) -> TicketResult<Attachment> {
    if attachment.is_empty() {
        return Err(TicketError::MissingSignature("signature is empty".into()));
    }
    validate_attachment(&attachment)?;

    let format = image::guess_format(&attachment.data)
        .map_err(|_| TicketError::MissingSignature("signature is not an image".into()))?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SIGNATURE_DIMENSION);
    limits.max_image_height = Some(MAX_SIGNATURE_DIMENSION);
    limits.max_alloc = Some(MAX_SIGNATURE_ALLOC);

    let mut reader = ImageReader::with_format(Cursor::new(attachment.data.as_slice()), format);
    reader.limits(limits);
    let img = reader
        .decode()
        .map_err(|e| TicketError::MissingSignature(format!("signature image is unreadable: {e}")))?;

    if is_blank(&img) {
        return Err(TicketError::MissingSignature("signature canvas is blank".into()));
    }

    attachment.kind = AttachmentKind::Signature;
    attachment.mime_type = Some(format.to_mime_type().to_string());
    Ok(attachment)
}

/// A canvas is blank when it has no pixels, every pixel is fully
/// transparent, or every pixel has the same color.
fn is_blank(img: &DynamicImage) -> bool {
    let mut pixels = img.pixels().map(|(_, _, p)| p);
    let Some(first) = pixels.next() else {
        return true;
    };

    let mut visible = first[3] != 0;
    let mut varied = false;
    for p in pixels {
        visible |= p[3] != 0;
        varied |= p != first;
        if visible && varied {
            return false;
        }
    }
    true
}
