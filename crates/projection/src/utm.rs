//! UTM zone selection.

use tiler_common::CrsId;

/// WGS84 / UTM CRS whose zone contains (lon, lat).
///
/// Northern hemisphere zones are EPSG:326zz, southern EPSG:327zz. The
/// Norway and Svalbard zone exceptions are not applied.
pub fn utm_zone_for(lon: f64, lat: f64) -> CrsId {
    let zone = utm_zone_number(lon);
    let base = if lat >= 0.0 { 32600 } else { 32700 };
    CrsId::epsg(base + zone)
}

fn utm_zone_number(lon: f64) -> u32 {
    // Wrap into [-180, 180) so 180°E lands in zone 1 like -180°.
    let wrapped = (lon + 180.0).rem_euclid(360.0);
    ((wrapped / 6.0).floor() as u32 + 1).clamp(1, 60)
}
