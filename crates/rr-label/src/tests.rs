//! Unit tests for rr-label.

#[cfg(test)]
mod helpers {
    use geo::{Coord, LineString, Point, Polygon, Rect};
    use rr_core::GeoPoint;

    use crate::Feature;

    pub const LAT: f64 = 35.83;

    /// East–west route of ~900 m along `LAT`.
    pub fn route() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(LAT, 128.750),
            GeoPoint::new(LAT, 128.755),
            GeoPoint::new(LAT, 128.760),
        ]
    }

    pub fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Polygon<f64> {
        Rect::new(Coord { x: min_lon, y: min_lat }, Coord { x: max_lon, y: max_lat }).to_polygon()
    }

    pub fn park(poly: Polygon<f64>) -> Feature {
        Feature::new(poly).with_tag("leisure", "park")
    }

    pub fn river(coords: &[(f64, f64)]) -> Feature {
        let ls: LineString<f64> = coords.iter().map(|&(lon, lat)| Coord { x: lon, y: lat }).collect();
        Feature::new(ls).with_tag("waterway", "river")
    }

    pub fn point(lat: f64, lon: f64) -> Feature {
        Feature::new(Point::new(lon, lat))
    }
}

// ── Buffer & projection ───────────────────────────────────────────────────────

#[cfg(test)]
mod buffer {
    use geo::{Area, Contains, Point};
    use rr_core::{GeoPoint, METERS_PER_DEGREE, RouteConfig};

    use crate::{FeatureLabeler, LocalProjection, route_buffer};

    #[test]
    fn empty_route_has_no_buffer() {
        assert!(route_buffer(&[], 0.001).is_none());
        assert!(FeatureLabeler::default().buffer(&[]).is_err());
    }

    #[test]
    fn buffer_contains_route_and_margin() {
        let route = super::helpers::route();
        let buffer = FeatureLabeler::default().buffer(&route).unwrap();
        assert!(buffer.contains(&Point::new(128.755, 35.83)));
        // ~55 m north of the line.
        assert!(buffer.contains(&Point::new(128.755, 35.8305)));
        // ~222 m north of the line.
        assert!(!buffer.contains(&Point::new(128.755, 35.832)));
    }

    #[test]
    fn single_point_route_buffers_as_a_disc() {
        let p = GeoPoint::new(35.83, 128.75);
        let buffer = route_buffer(&[p, p], 0.001).unwrap();
        assert!(buffer.contains(&Point::new(128.7505, 35.83)));
        assert!(buffer.unsigned_area() > 0.0);
    }

    #[test]
    fn projection_is_metric() {
        let proj = LocalProjection::new(GeoPoint::new(0.0, 0.0), METERS_PER_DEGREE);
        let c = proj.project(geo::Coord { x: 1.0, y: 1.0 });
        assert!((c.x - 111_000.0).abs() < 1e-6);
        assert!((c.y - 111_000.0).abs() < 1e-6);

        let proj = LocalProjection::new(GeoPoint::new(60.0, 10.0), METERS_PER_DEGREE);
        let c = proj.project(geo::Coord { x: 11.0, y: 60.0 });
        assert!((c.x - 55_500.0).abs() < 1e-6);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn buffer_radius_projects_back_to_metres() {
        let mut config = RouteConfig::default();
        config.meters_per_degree = 111_320.0;
        let labeler = FeatureLabeler::from_config(&config);
        assert_eq!(labeler.meters_per_degree, 111_320.0);

        let origin = GeoPoint::new(35.83, 128.75);
        let proj = LocalProjection::new(origin, labeler.meters_per_degree);
        let edge = proj.project(geo::Coord { x: origin.lon, y: origin.lat + labeler.buffer_radius_deg });
        assert!((edge.y - config.buffer_radius_m).abs() < 1e-6, "half-width {}", edge.y);
    }

    #[test]
    fn buffer_area_is_about_expected() {
        let route = super::helpers::route();
        let buffer = FeatureLabeler::default().buffer(&route).unwrap();
        let proj = LocalProjection::new(route[0], METERS_PER_DEGREE);
        let area = proj.apply(&buffer).unsigned_area();
        // Stadium of half-width 100 m (north–south), ~81 m (east–west caps).
        let expected = 2.0 * 100.0 * 899.9 + std::f64::consts::PI * 81.1 * 100.0;
        assert!((area - expected).abs() / expected < 0.02, "area {area}, expected {expected}");
    }
}

// ── Summaries ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary {
    use crate::{Feature, FeatureLabeler, FeatureSummary, FeatureTable, StopKind};

    use super::helpers::{LAT, park, point, rect, river, route};

    fn summarize(features: Vec<Feature>) -> crate::Labeled {
        let labeler = FeatureLabeler::default();
        let route = route();
        let buffer = labeler.buffer(&route).unwrap();
        labeler.summarize(&route, &buffer, &FeatureTable::from(features))
    }

    #[test]
    fn nothing_nearby_is_all_zero() {
        let labeled = summarize(vec![]);
        assert_eq!(labeled.summary, FeatureSummary::default());
        assert!(labeled.stops.is_empty());
    }

    #[test]
    fn park_covering_buffer_is_full_ratio() {
        let labeled = summarize(vec![park(rect(128.74, 35.82, 128.77, 35.84))]);
        let p = labeled.summary.park;
        assert_eq!(p.count, 1);
        assert!(p.ratio > 0.99 && p.ratio <= 1.0, "ratio {}", p.ratio);
    }

    #[test]
    fn park_covering_north_half() {
        let labeled = summarize(vec![park(rect(128.74, LAT, 128.77, 35.84))]);
        let p = labeled.summary.park;
        assert!((p.ratio - 0.5).abs() < 0.01, "ratio {}", p.ratio);
        assert!(p.area_m2 > 90_000.0 && p.area_m2 < 115_000.0, "area {}", p.area_m2);
    }

    #[test]
    fn overlapping_parks_clamp_to_one() {
        let big = rect(128.74, 35.82, 128.77, 35.84);
        let labeled = summarize(vec![park(big.clone()), park(big)]);
        assert_eq!(labeled.summary.park.count, 2);
        assert_eq!(labeled.summary.park.ratio, 1.0);
    }

    #[test]
    fn park_outside_buffer_counts_without_area() {
        let labeled = summarize(vec![park(rect(128.80, 35.90, 128.81, 35.91))]);
        assert_eq!(labeled.summary.park.count, 1);
        assert_eq!(labeled.summary.park.area_m2, 0.0);
        assert_eq!(labeled.summary.park.ratio, 0.0);
    }

    #[test]
    fn river_crossing_route() {
        // North–south river through the middle: 200 m inside the buffer
        // against a ~900 m route.
        let labeled = summarize(vec![river(&[(128.755, 35.82), (128.755, 35.84)])]);
        let r = labeled.summary.river;
        assert_eq!(r.count, 1);
        assert!((r.length_m - 200.0).abs() < 1e-6, "length {}", r.length_m);
        assert!((r.ratio - 0.2222).abs() < 0.005, "ratio {}", r.ratio);
    }

    #[test]
    fn river_along_route_clamps() {
        let labeled = summarize(vec![river(&[(128.74, LAT), (128.77, LAT)])]);
        assert_eq!(labeled.summary.river.ratio, 1.0);
    }

    #[test]
    fn shops_and_crossings_are_counted() {
        let labeled = summarize(vec![
            point(LAT, 128.751).with_tag("shop", "convenience"),
            point(LAT, 128.752).with_tag("shop", "bakery").with_tag("amenity", "cafe"),
            point(LAT, 128.753).with_tag("amenity", "bench"),
            point(LAT, 128.754).with_tag("highway", "crossing"),
            point(LAT, 128.756).with_tag("highway", "traffic_signals"),
        ]);
        assert_eq!(labeled.summary.amenity.count, 2);
        assert_eq!(labeled.summary.cross.count, 1);
    }

    #[test]
    fn stops_inside_buffer_only() {
        let labeled = summarize(vec![
            point(35.8302, 128.752).with_tag("highway", "bus_stop"),
            point(35.835, 128.752).with_tag("highway", "bus_stop"),
            point(35.8298, 128.758).with_tag("railway", "subway_entrance"),
            // Stop areas drawn as polygons are not stop points.
            Feature::new(rect(128.753, 35.8299, 128.7531, 35.8301)).with_tag("highway", "bus_stop"),
        ]);
        assert_eq!(labeled.stops.len(), 2);
        assert_eq!(labeled.stops[0].kind, StopKind::Bus);
        assert_eq!(labeled.stops[0].position.lat, 35.8302);
        assert_eq!(labeled.stops[0].position.lon, 128.752);
        assert_eq!(labeled.stops[1].kind, StopKind::Subway);
    }

    #[test]
    fn single_point_route_has_zero_river_ratio() {
        let labeler = FeatureLabeler::default();
        let route = vec![rr_core::GeoPoint::new(LAT, 128.755)];
        let buffer = labeler.buffer(&route).unwrap();
        let table = FeatureTable::from(vec![river(&[(128.755, 35.82), (128.755, 35.84)])]);
        let labeled = labeler.summarize(&route, &buffer, &table);
        assert_eq!(labeled.summary.river.count, 1);
        assert!(labeled.summary.river.length_m > 0.0);
        assert_eq!(labeled.summary.river.ratio, 0.0);
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sources {
    use std::io::{Cursor, Write};

    use geo::MultiPolygon;

    use crate::{
        CsvFeatureSource, FEATURE_TAGS, FeatureLabeler, FeatureSource, FeatureTable, LabelError,
        LabelResult,
    };

    use super::helpers::{park, rect, route};

    const CSV: &str = "geometry,leisure,highway,shop,waterway,railway\n\
        \"POLYGON((128.74 35.82,128.77 35.82,128.77 35.84,128.74 35.84,128.74 35.82))\",park,,,,\n\
        POINT(128.752 35.8302),,bus_stop,,,\n\
        POINT(128.753 35.8301),,,bakery,,\n\
        POINT(128.90 35.90),,,bakery,,\n\
        POINT(128.754 35.8300),,,,,\n";

    #[test]
    fn csv_rows_become_features() {
        let source = CsvFeatureSource::from_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn csv_query_filters_by_area_and_tags() {
        let source = CsvFeatureSource::from_reader(Cursor::new(CSV)).unwrap();
        let labeler = FeatureLabeler::default();
        let buffer = labeler.buffer(&route()).unwrap();
        let table = source.query(&buffer, &FEATURE_TAGS).unwrap();
        // The far bakery is outside; the untagged point has no requested tag.
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|f| !f.tags.is_empty()));
        assert!(table.iter().all(|f| f.tags.values().all(|v| !v.is_empty())));

        let only_shops = source.query(&buffer, &["shop"]).unwrap();
        assert_eq!(only_shops.len(), 1);
    }

    #[test]
    fn label_from_csv() {
        let source = CsvFeatureSource::from_reader(Cursor::new(CSV)).unwrap();
        let labeled = FeatureLabeler::default().label(&route(), &source).unwrap();
        assert_eq!(labeled.summary.park.count, 1);
        assert!(labeled.summary.park.ratio > 0.99);
        assert_eq!(labeled.summary.amenity.count, 1);
        assert_eq!(labeled.stops.len(), 1);
    }

    #[test]
    fn in_memory_source() {
        let source = CsvFeatureSource::from_features(vec![
            park(rect(128.74, 35.82, 128.77, 35.84)),
            park(rect(129.00, 36.00, 129.01, 36.01)),
        ]);
        assert_eq!(source.len(), 2);
        let buffer = FeatureLabeler::default().buffer(&route()).unwrap();
        assert_eq!(source.query(&buffer, &["leisure"]).unwrap().len(), 1);
        assert!(source.query(&buffer, &["waterway"]).unwrap().is_empty());
    }

    #[test]
    fn csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let source = CsvFeatureSource::from_path(file.path()).unwrap();
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn bad_wkt_is_a_geometry_error() {
        let csv = "geometry,shop\nPOINT(oops),bakery\n";
        let result = CsvFeatureSource::from_reader(Cursor::new(csv));
        assert!(matches!(result, Err(LabelError::Geometry(_))));
    }

    #[test]
    fn missing_geometry_column() {
        let csv = "wkt,shop\nPOINT(1 2),bakery\n";
        let result = CsvFeatureSource::from_reader(Cursor::new(csv));
        assert!(matches!(result, Err(LabelError::Geometry(_))));
    }

    #[test]
    fn closure_source_sees_all_tags() {
        let source = |_: &MultiPolygon<f64>, tags: &[&str]| -> LabelResult<FeatureTable> {
            assert_eq!(tags, FEATURE_TAGS.as_slice());
            Ok(FeatureTable::from(vec![park(rect(128.74, 35.82, 128.77, 35.84))]))
        };
        let labeled = FeatureLabeler::default().label(&route(), &source).unwrap();
        assert_eq!(labeled.summary.park.count, 1);
    }

    #[test]
    fn failing_source_propagates() {
        let source = |_: &MultiPolygon<f64>, _: &[&str]| -> LabelResult<FeatureTable> {
            Err(LabelError::FeatureQuery("timeout".into()))
        };
        let result = FeatureLabeler::default().label(&route(), &source);
        assert!(matches!(result, Err(LabelError::FeatureQuery(_))));
    }
}
