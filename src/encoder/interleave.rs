use crate::encoder::error::EncodeError;
use crate::encoder::reed_solomon::ReedSolomonEncoder;
use crate::encoder::tables::Capacity;

/// Split `data` into RS blocks, append parity to each and interleave.
///
/// Data codewords are read column-major across blocks (shorter blocks skip
/// their missing tail), followed by the parity codewords in the same order.
pub fn interleave(data: &[u8], capacity: &Capacity) -> Result<Vec<u8>, EncodeError> {
    capacity.validate()?;
    if data.len() != capacity.data {
        return Err(EncodeError::InternalCapacity(format!(
            "{} data codewords supplied, table expects {}",
            data.len(),
            capacity.data
        )));
    }

    let mut data_blocks: Vec<&[u8]> = Vec::with_capacity(capacity.num_blocks());
    let mut ecc_blocks: Vec<Vec<u8>> = Vec::with_capacity(capacity.num_blocks());
    let mut offset = 0;
    for block in &capacity.blocks {
        let rs = ReedSolomonEncoder::new(block.ecc());
        for _ in 0..block.num {
            let chunk = &data[offset..offset + block.data];
            offset += block.data;
            ecc_blocks.push(rs.encode(chunk));
            data_blocks.push(chunk);
        }
    }

    let mut out = Vec::with_capacity(capacity.total);
    column_major(&data_blocks, &mut out);
    column_major(&ecc_blocks, &mut out);

    if out.len() != capacity.total {
        return Err(EncodeError::InternalCapacity(format!(
            "interleaved {} codewords, table expects {}",
            out.len(),
            capacity.total
        )));
    }
    Ok(out)
}

fn column_major<B: AsRef<[u8]>>(blocks: &[B], out: &mut Vec<u8>) {
    let longest = blocks.iter().map(|b| b.as_ref().len()).max().unwrap_or(0);
    for k in 0..longest {
        for block in blocks {
            if let Some(&byte) = block.as_ref().get(k) {
                out.push(byte);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tables::Block;

    #[test]
    fn test_single_block_is_data_then_parity() {
        let cap = Capacity::new(26, &[Block::new(1, 26, 16)], 0);
        let data: Vec<u8> = (0..16).collect();
        let out = interleave(&data, &cap).unwrap();
        assert_eq!(&out[..16], &data[..]);
        assert_eq!(&out[16..], &ReedSolomonEncoder::new(10).encode(&data)[..]);
    }

    #[test]
    fn test_two_groups_interleave() {
        // 2 blocks of 2 data + 2 blocks of 3 data, 2 parity each
        let cap = Capacity::new(18, &[Block::new(2, 4, 2), Block::new(2, 5, 3)], 0);
        let data = [10, 11, 20, 21, 30, 31, 32, 40, 41, 42];
        let out = interleave(&data, &cap).unwrap();
        assert_eq!(&out[..10], &[10, 20, 30, 40, 11, 21, 31, 41, 32, 42]);

        let rs = ReedSolomonEncoder::new(2);
        let parity: Vec<Vec<u8>> = [&data[0..2], &data[2..4], &data[4..7], &data[7..10]]
            .iter()
            .map(|b| rs.encode(b))
            .collect();
        let expected: Vec<u8> = (0..2).flat_map(|k| parity.iter().map(move |p| p[k])).collect();
        assert_eq!(&out[10..], &expected[..]);
    }

    #[test]
    fn test_length_mismatch() {
        let cap = Capacity::new(26, &[Block::new(1, 26, 16)], 0);
        assert!(matches!(
            interleave(&[0; 15], &cap),
            Err(EncodeError::InternalCapacity(_))
        ));
    }
}
