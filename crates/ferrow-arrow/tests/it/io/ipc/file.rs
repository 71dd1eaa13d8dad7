use ferrow_arrow::io::ipc::write::{schema_to_bytes, FileWriter, WriteOptions};
use ferrow_arrow::io::ipc::{Block, FERROW_MAGIC};
use ferrow_arrow::record_batch::RecordBatchT;
use ferrow_arrow::vector::Int64Vector;
use ferrow_error::{FerrowError, FerrowResult};

use super::common::*;

fn write_file(n: usize, options: WriteOptions) -> FerrowResult<(Vec<u8>, Block, Vec<Block>)> {
    let schema = ts_schema();
    let mut writer = FileWriter::try_new(Vec::<u8>::new(), schema.clone(), options)?;
    for i in 0..n {
        let values: Vec<Option<i64>> = (0..10).map(|x| (x % (i + 2) != 0).then_some(x as i64)).collect();
        let ts = Int64Vector::from_options("ts", &values)?;
        writer.write(&RecordBatchT::try_new(schema.clone(), vec![ts.as_vector()])?)?;
    }
    writer.close()?;
    assert!(writer.is_closed());
    assert_eq!(writer.bytes_written() as usize, writer.get_ref().len());
    let schema_block = writer.schema_block();
    let blocks = writer.record_blocks().to_vec();
    Ok((writer.into_inner()?, schema_block, blocks))
}

/// Locates the footer the way a reader would: from the end of the file.
fn read_footer(bytes: &[u8]) -> (usize, Vec<Block>) {
    let len = bytes.len();
    assert_eq!(&bytes[len - 6..], &FERROW_MAGIC);
    let footer_len = i32::from_le_bytes(bytes[len - 10..len - 6].try_into().unwrap()) as usize;
    let start = len - 10 - footer_len;
    let footer = &bytes[start..len - 10];

    assert_eq!(u16_at(footer, 0), 1);
    let schema_len = schema_to_bytes(&ts_schema()).unwrap().len();
    assert_eq!(&footer[2..2 + schema_len], schema_to_bytes(&ts_schema()).unwrap().as_slice());
    let mut pos = 2 + schema_len;
    let n = u32_at(footer, pos) as usize;
    pos += 4;
    let blocks = (0..n)
        .map(|i| {
            let at = pos + i * 20;
            Block {
                offset: u64_at(footer, at),
                meta_data_length: u32_at(footer, at + 8),
                body_length: u64_at(footer, at + 12),
            }
        })
        .collect::<Vec<_>>();
    assert_eq!(pos + n * 20, footer.len());
    (start, blocks)
}

#[test]
fn footer_indexes_every_batch() -> FerrowResult<()> {
    let (bytes, schema_block, blocks) = write_file(4, WriteOptions::default())?;

    assert_eq!(&bytes[..6], &FERROW_MAGIC);
    assert_eq!(&bytes[6..8], &[0, 0]);
    assert_eq!(schema_block.offset, 8);
    assert_eq!(schema_block.body_length, 0);

    let (footer_start, footer_blocks) = read_footer(&bytes);
    assert_eq!(footer_blocks, blocks);
    assert_eq!(footer_blocks.len(), 4);

    for (i, block) in footer_blocks.iter().enumerate() {
        let message = read_message(&bytes, block.offset as usize).unwrap();
        assert_eq!(message.kind(), 2);
        assert_eq!(message.rows(), 10);
        assert_eq!(4 + message.metadata.len(), block.meta_data_length as usize);
        assert_eq!(message.body.len() as u64, block.body_length);
        // every (i + 2)-th value is null, starting with 0
        assert_eq!(message.column(0)[0] as usize, (0..10).filter(|x| x % (i + 2) == 0).count());
    }

    // the stream inside the file ends with the marker right before the footer
    let (messages, end) = read_stream(&bytes, 8);
    assert_eq!(messages.len(), 5);
    assert_eq!(end, footer_start);
    Ok(())
}

#[test]
fn empty_file() -> FerrowResult<()> {
    let (bytes, schema_block, blocks) = write_file(0, WriteOptions::default())?;
    assert!(blocks.is_empty());
    let (footer_start, footer_blocks) = read_footer(&bytes);
    assert!(footer_blocks.is_empty());
    assert_eq!(
        footer_start,
        8 + schema_block.meta_data_length as usize + 4
    );
    Ok(())
}

#[test]
fn aligned_file() -> FerrowResult<()> {
    let (bytes, _, blocks) = write_file(3, WriteOptions::default().with_alignment(8))?;
    let (_, footer_blocks) = read_footer(&bytes);
    assert_eq!(footer_blocks, blocks);
    for block in blocks {
        assert_eq!(block.offset % 8, 0);
        assert_eq!(block.meta_data_length % 8, 0);
        // validity 2 -> 8, values 80
        assert_eq!(block.body_length, 88);
    }
    Ok(())
}

#[test]
fn close_twice() -> FerrowResult<()> {
    let mut writer = FileWriter::try_new(Vec::<u8>::new(), ts_schema(), Default::default())?;
    writer.close()?;
    let len = writer.get_ref().len();
    assert!(matches!(writer.close(), Err(FerrowError::WriterClosed(_))));
    assert_eq!(writer.get_ref().len(), len);
    Ok(())
}

#[test]
fn failed_close_is_tagged() -> FerrowResult<()> {
    let header_and_schema = 8 + 4 + schema_to_bytes(&ts_schema())?.len();
    let mut writer = FileWriter::try_new(
        FailingSink::new(header_and_schema + 2),
        ts_schema(),
        Default::default(),
    )?;
    let err = writer.close().unwrap_err();
    assert!(err.is_io());
    assert!(err.to_string().contains("[ipc][file-writer][close]"));
    assert!(matches!(writer.close(), Err(FerrowError::WriterClosed(_))));
    Ok(())
}
