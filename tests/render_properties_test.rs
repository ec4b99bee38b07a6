use connections_map::core::geometry::ConnectorShape;
use connections_map::{Entity, RelationshipRenderer, RelationshipResult, RenderStyle, Role, SceneMap};

fn render(result: &RelationshipResult, style: RenderStyle) -> RelationshipRenderer<SceneMap> {
    let mut renderer = RelationshipRenderer::new(SceneMap::new(1024.0, 768.0), style);
    renderer.render(result, Role::ServiceProvider);
    renderer
}

#[test]
fn test_connector_midpoint_is_raised_by_fifth_of_distance() {
    let result = RelationshipResult::new(
        Entity::named("Center").with_position(0.0, 0.0),
        vec![Entity::named("Related").with_position(2.0, 2.0)],
    );
    let expected_lat = 1.0 + 8f64.sqrt() * 0.2;

    for shape in [ConnectorShape::Bezier, ConnectorShape::Straight3] {
        let mut style = RenderStyle::default();
        style.curve.shape = shape;
        let renderer = render(&result, style);

        let connectors = renderer.map().unwrap().connectors();
        assert_eq!(connectors.len(), 1);
        let path = &connectors[0].path;
        let mid = path[path.len() / 2];
        assert!((mid.lon - 1.0).abs() < 1e-9, "{:?}: {:?}", shape, mid);
        assert!((mid.lat - expected_lat).abs() < 1e-9, "{:?}: {:?}", shape, mid);
    }
}

#[test]
fn test_viewport_fits_both_points_within_padding() {
    let result = RelationshipResult::new(
        Entity::named("Center").with_position(0.0, 0.0),
        vec![Entity::named("Related").with_position(10.0, 10.0)],
    );
    let style = RenderStyle::default();
    let padding = style.fit.padding;
    let max_zoom = style.fit.max_zoom;
    let renderer = render(&result, style);

    let viewport = renderer.map().unwrap().viewport();
    assert!(viewport.zoom <= max_zoom);
    for entity in [&result.center, &result.related[0]] {
        let (x, y) = viewport.to_pixel(entity.position().unwrap());
        assert!(x >= padding - 1e-6 && x <= viewport.width - padding + 1e-6);
        assert!(y >= padding - 1e-6 && y <= viewport.height - padding + 1e-6);
    }
}

#[test]
fn test_single_located_entity_does_not_over_zoom() {
    let result = RelationshipResult::new(
        Entity::named("Center"),
        vec![
            Entity::named("Only").with_position(-0.1276, 51.5072),
            Entity::named("Unknown"),
        ],
    );
    let renderer = render(&result, RenderStyle::default());

    let scene = renderer.map().unwrap();
    assert_eq!(scene.marker_count(), 1);
    assert!(scene.connectors().is_empty());
    assert_eq!(scene.viewport().zoom, 15.0);
}

#[test]
fn test_missing_coordinates_do_not_affect_other_entities() {
    let located = vec![
        Entity::named("A").with_position(5.0, 5.0),
        Entity::named("B").with_position(-5.0, 5.0),
    ];
    let mut with_gaps = located.clone();
    with_gaps.insert(1, Entity::named("No location"));
    with_gaps.push(Entity::named("Half").with_domain("half.example"));

    let center = Entity::named("Center").with_position(0.0, 0.0);
    let clean = render(
        &RelationshipResult::new(center.clone(), located),
        RenderStyle::default(),
    );
    let gappy = render(
        &RelationshipResult::new(center, with_gaps),
        RenderStyle::default(),
    );

    let positions = |r: &RelationshipRenderer<SceneMap>| {
        r.map()
            .unwrap()
            .markers()
            .map(|(_, m)| (m.name.clone(), m.position))
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(&clean), positions(&gappy));
    assert_eq!(
        clean.map().unwrap().viewport(),
        gappy.map().unwrap().viewport()
    );
}
