//! Value range of CCP4/MRC density maps.
//!
//! Only the header fields needed to locate the voxel block are read. The
//! range is scanned from the voxels for modes 0, 1 and 2; other modes fall
//! back to the header's DMIN/DMAX.

use crate::iso::ValueRange;

const HEADER_LEN: usize = 1024;
const MODE_OFFSET: usize = 12;
const DMIN_OFFSET: usize = 76;
const DMAX_OFFSET: usize = 80;
const NSYMBT_OFFSET: usize = 92;
const MACHST_OFFSET: usize = 212;

#[derive(Clone, Copy)]
struct Reader<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl Reader<'_> {
    fn bytes<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.data.get(offset..offset + N)?.try_into().ok()
    }

    fn i32(&self, offset: usize) -> Option<i32> {
        let b = self.bytes::<4>(offset)?;
        Some(if self.big_endian {
            i32::from_be_bytes(b)
        } else {
            i32::from_le_bytes(b)
        })
    }

    fn f32(&self, offset: usize) -> Option<f32> {
        let b = self.bytes::<4>(offset)?;
        Some(if self.big_endian {
            f32::from_be_bytes(b)
        } else {
            f32::from_le_bytes(b)
        })
    }

    fn i16(&self, offset: usize) -> Option<i16> {
        let b = self.bytes::<2>(offset)?;
        Some(if self.big_endian {
            i16::from_be_bytes(b)
        } else {
            i16::from_le_bytes(b)
        })
    }
}

fn scan(values: impl Iterator<Item = f64>) -> Option<ValueRange> {
    values.fold(None, |acc: Option<ValueRange>, v| {
        if v.is_nan() {
            return acc;
        }
        Some(acc.map_or(ValueRange::new(v, v), |r| {
            ValueRange::new(r.min.min(v), r.max.max(v))
        }))
    })
}

/// Value range of a CCP4 map.
pub fn volume_value_range(data: &[u8]) -> Result<ValueRange, String> {
    if data.len() < HEADER_LEN {
        return Err(format!(
            "map is {} bytes, shorter than the {HEADER_LEN} byte header",
            data.len()
        ));
    }

    // Machine stamp 0x11 0x11 marks big-endian files.
    let r = Reader {
        data,
        big_endian: data[MACHST_OFFSET] == 0x11,
    };
    let header_range = || -> Result<ValueRange, String> {
        match (r.f32(DMIN_OFFSET), r.f32(DMAX_OFFSET)) {
            (Some(min), Some(max)) => {
                Ok(ValueRange::new(f64::from(min), f64::from(max)))
            }
            _ => Err("map header is truncated".to_owned()),
        }
    };

    let dims = [r.i32(0), r.i32(4), r.i32(8)];
    let (Some(mode), Some(nsymbt), [Some(nc), Some(nr), Some(ns)]) =
        (r.i32(MODE_OFFSET), r.i32(NSYMBT_OFFSET), dims)
    else {
        return header_range();
    };
    if nc <= 0 || nr <= 0 || ns <= 0 || nsymbt < 0 {
        return Err(format!("invalid map dimensions {nc}x{nr}x{ns}"));
    }

    let count = (nc as usize)
        .checked_mul(nr as usize)
        .and_then(|n| n.checked_mul(ns as usize));
    let start = HEADER_LEN.checked_add(nsymbt as usize);
    let (Some(count), Some(start)) = (count, start) else {
        return Err(format!("invalid map dimensions {nc}x{nr}x{ns}"));
    };
    let width = match mode {
        0 => 1,
        1 => 2,
        2 => 4,
        other => {
            log::debug!("map mode {other} is not scanned, using header range");
            return header_range();
        }
    };
    let Some(end) = count.checked_mul(width).and_then(|n| n.checked_add(start))
    else {
        return Err(format!("invalid map dimensions {nc}x{nr}x{ns}"));
    };
    let Some(voxels) = data.get(start..end) else {
        return Err(format!(
            "map holds fewer than the {count} voxels its header declares"
        ));
    };

    let body = Reader {
        data: voxels,
        big_endian: r.big_endian,
    };
    let offsets = (0..count).map(|i| i * width);
    let range = match mode {
        0 => scan(voxels.iter().map(|&b| f64::from(b as i8))),
        1 => scan(offsets.filter_map(|o| body.i16(o)).map(f64::from)),
        _ => scan(offsets.filter_map(|o| body.f32(o)).map(f64::from)),
    };
    range.map_or_else(header_range, Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ccp4_map;

    #[test]
    fn scans_float_voxels() {
        let map = ccp4_map(&[0.5, -1.25, 3.0, 2.0]);
        assert_eq!(
            volume_value_range(&map).unwrap(),
            ValueRange::new(-1.25, 3.0)
        );
    }

    #[test]
    fn ignores_header_statistics_when_voxels_present() {
        let mut map = ccp4_map(&[1.0, 2.0]);
        map[DMIN_OFFSET..DMIN_OFFSET + 4].copy_from_slice(&(-9.0f32).to_le_bytes());
        assert_eq!(volume_value_range(&map).unwrap(), ValueRange::new(1.0, 2.0));
    }

    #[test]
    fn unsupported_mode_uses_header() {
        let mut map = ccp4_map(&[1.0, 2.0]);
        map[MODE_OFFSET..MODE_OFFSET + 4].copy_from_slice(&6i32.to_le_bytes());
        map[DMIN_OFFSET..DMIN_OFFSET + 4].copy_from_slice(&(-4.0f32).to_le_bytes());
        map[DMAX_OFFSET..DMAX_OFFSET + 4].copy_from_slice(&8.0f32.to_le_bytes());
        assert_eq!(volume_value_range(&map).unwrap(), ValueRange::new(-4.0, 8.0));
    }

    #[test]
    fn rejects_short_input() {
        assert!(volume_value_range(&[0u8; 100]).is_err());
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let mut map = ccp4_map(&[1.0, 2.0]);
        for offset in [0, 4, 8] {
            map[offset..offset + 4].copy_from_slice(&i32::MAX.to_le_bytes());
        }
        assert_eq!(
            volume_value_range(&map),
            Err(format!(
                "invalid map dimensions {0}x{0}x{0}",
                i32::MAX
            ))
        );
    }

    #[test]
    fn rejects_truncated_voxels() {
        let mut map = ccp4_map(&[1.0, 2.0, 3.0]);
        map.truncate(map.len() - 4);
        assert!(volume_value_range(&map).is_err());
    }
}
