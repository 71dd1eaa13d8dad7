use ferrow_arrow::bitmap::ValidityBitmap;
use proptest::prelude::*;

#[test]
fn grows_zeroed() {
    let mut bitmap = ValidityBitmap::new();
    assert_eq!(bitmap.capacity(), 0);
    bitmap.ensure_capacity(1).unwrap();
    bitmap.set_valid(0);
    bitmap.ensure_capacity(100).unwrap();
    assert_eq!(bitmap.as_slice().len(), 13);
    assert!(bitmap.get(0));
    assert_eq!(bitmap.unset_bits(100), 99);
}

#[test]
fn debug() {
    let mut bitmap = ValidityBitmap::with_capacity(10).unwrap();
    bitmap.set_valid(0);
    bitmap.set_valid(9);
    assert_eq!(
        format!("{bitmap:?}"),
        "ValidityBitmap { capacity: 16, bits: [00000001 00000010] }"
    );
}

proptest! {
    #[test]
    #[cfg_attr(miri, ignore)] // miri and proptest do not work well :(
    fn repacked_matches_source(
        bits in proptest::collection::vec(any::<bool>(), 0..300),
        offset in 0usize..300,
    ) {
        let offset = offset.min(bits.len());
        let len = bits.len() - offset;
        let mut bitmap = ValidityBitmap::with_capacity(bits.len()).unwrap();
        for (i, bit) in bits.iter().enumerate() {
            bitmap.set(i, *bit);
        }
        let sliced = bitmap.sliced_repacked(offset, len).unwrap();
        prop_assert!(sliced.iter(len).eq(bits[offset..].iter().copied()));
        prop_assert_eq!(sliced.unset_bits(len), bits[offset..].iter().filter(|b| !**b).count());
    }
}
