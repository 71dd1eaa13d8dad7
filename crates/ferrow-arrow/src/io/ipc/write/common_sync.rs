use std::io::Write;

use ferrow_error::{ferrow_err, FerrowResult};

use super::super::EOS_MARKER;
use super::common::{pad_to_alignment, EncodedData};

/// Length of the length prefix plus `metadata_size` bytes of metadata padded to `alignment`.
///
/// # Errors
/// `ComputeError` iff that length does not fit in a `u32`.
pub(crate) fn framed_metadata_size(metadata_size: usize, alignment: usize) -> FerrowResult<u32> {
    u32::try_from(metadata_size)
        .ok()
        .and_then(|size| size.checked_add(4))
        .and_then(|size| {
            let padding = pad_to_alignment(size as usize, alignment);
            u32::try_from(padding).ok().and_then(|padding| size.checked_add(padding))
        })
        .ok_or_else(|| {
            ferrow_err!(ComputeError: "metadata of {} bytes does not fit in a message", metadata_size)
        })
}

/// Write a message's metadata and body, returning the length of the length prefix plus the
/// padded metadata, and the length of the body.
pub fn write_message<W: Write>(
    writer: &mut W,
    encoded: &EncodedData,
    alignment: usize,
) -> FerrowResult<(usize, usize)> {
    let prefix_size = 4;
    let metadata_size = encoded.metadata.len();
    let aligned_size = framed_metadata_size(metadata_size, alignment)? as usize;
    let padding_bytes = aligned_size - prefix_size - metadata_size;

    let declared = (aligned_size - prefix_size) as u32;
    // a metadata length of zero is the end-of-stream marker
    debug_assert!(declared > 0);
    writer.write_all(&declared.to_le_bytes())?;

    writer.write_all(&encoded.metadata)?;
    writer.write_all(&vec![0u8; padding_bytes])?;

    // the body is padded buffer by buffer when encoded
    if !encoded.body.is_empty() {
        writer.write_all(&encoded.body)?;
    }

    Ok((aligned_size, encoded.body.len()))
}

/// Writes the end-of-stream marker, returning the number of bytes written.
pub fn write_eos<W: Write>(writer: &mut W) -> FerrowResult<usize> {
    writer.write_all(&EOS_MARKER)?;
    Ok(EOS_MARKER.len())
}
