//! GeoKeyDirectory parsing.
//!
//! The directory (tag 34735) is a flat `u16` array: a 4-entry header
//! `[version, revision, minor, key_count]` followed by `key_count` entries of
//! `[key_id, tiff_tag_location, count, value_or_offset]`. Only inline SHORT
//! values (`tiff_tag_location == 0`) are needed here.

/// ProjectedCSTypeGeoKey
pub const PROJECTED_CS_TYPE: u16 = 3072;
/// GeographicTypeGeoKey
pub const GEOGRAPHIC_TYPE: u16 = 2048;

const USER_DEFINED: u16 = 32767;

fn inline_value(directory: &[u16], key: u16) -> Option<u16> {
    if directory.len() < 4 {
        return None;
    }
    let key_count = directory[3] as usize;

    directory[4..]
        .chunks_exact(4)
        .take(key_count)
        .find(|entry| entry[0] == key && entry[1] == 0)
        .map(|entry| entry[3])
}

/// EPSG code declared by a GeoKeyDirectory.
///
/// A projected CRS takes precedence over the geographic base CRS. Undefined
/// (0) and user-defined (32767) codes yield `None`.
pub fn epsg_from_geokeys(directory: &[u16]) -> Option<u32> {
    [PROJECTED_CS_TYPE, GEOGRAPHIC_TYPE]
        .into_iter()
        .filter_map(|key| inline_value(directory, key))
        .find(|&code| code != 0 && code != USER_DEFINED)
        .map(u32::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geographic_only() {
        let dir = [1, 1, 0, 2, 1024, 0, 1, 2, 2048, 0, 1, 4326];
        assert_eq!(epsg_from_geokeys(&dir), Some(4326));
    }

    #[test]
    fn test_projected_wins() {
        let dir = [1, 1, 0, 3, 1024, 0, 1, 1, 2048, 0, 1, 4326, 3072, 0, 1, 32633];
        assert_eq!(epsg_from_geokeys(&dir), Some(32633));
    }

    #[test]
    fn test_user_defined_projected_falls_back() {
        let dir = [1, 1, 0, 2, 2048, 0, 1, 4269, 3072, 0, 1, 32767];
        assert_eq!(epsg_from_geokeys(&dir), Some(4269));
    }

    #[test]
    fn test_truncated_directory() {
        assert_eq!(epsg_from_geokeys(&[1, 1]), None);
        // key_count claims more entries than exist
        assert_eq!(epsg_from_geokeys(&[1, 1, 0, 5, 2048, 0, 1]), None);
    }

    #[test]
    fn test_offset_values_ignored() {
        // GeographicTypeGeoKey stored in another tag (location != 0)
        let dir = [1, 1, 0, 1, 2048, 34736, 1, 0];
        assert_eq!(epsg_from_geokeys(&dir), None);
    }
}
