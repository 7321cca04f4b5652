//! Settings Deserialization Tests

use myth_pixelation::{InjectionPoint, LayerMask, PixelationFeature, PixelationSettings};

#[test]
fn full_settings_from_json() {
    let json = r#"{
        "enabled": true,
        "enable_in_scene_view": true,
        "layer_mask": 256,
        "injection_point": "BeforeRenderingPostProcessing",
        "pyramid_depth": 2,
        "material": {
            "id": 4,
            "name": "Pixelation",
            "sub_passes": ["MeshDraw", "VerticalBlur", "HorizontalBlur",
                           "Downsample", "ResolveDownsample", "PixelationToTarget"]
        }
    }"#;

    let settings: PixelationSettings = serde_json::from_str(json).unwrap();
    assert!(settings.enable_in_scene_view);
    assert_eq!(settings.layer_mask, LayerMask::from_layer(8));
    assert_eq!(
        settings.injection_point,
        InjectionPoint::BeforeRenderingPostProcessing
    );
    assert_eq!(settings.pyramid_depth, 2);
    assert!(settings.validated_material().is_ok());

    let feature = PixelationFeature::new(settings);
    assert!(feature.is_active());
    assert_eq!(
        feature.injection_point(),
        InjectionPoint::BeforeRenderingPostProcessing
    );
}

#[test]
fn missing_fields_take_defaults() {
    let settings: PixelationSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, PixelationSettings::default());
    assert!(!PixelationFeature::new(settings).is_active());
}

#[test]
fn settings_round_trip_through_json() {
    let settings = PixelationSettings {
        layer_mask: LayerMask::UI | LayerMask::WATER,
        injection_point: InjectionPoint::AfterRenderingOpaques,
        pyramid_depth: 5,
        ..Default::default()
    };
    let value = serde_json::to_value(&settings).unwrap();
    assert_eq!(value["layer_mask"], (LayerMask::UI | LayerMask::WATER).bits());
    assert_eq!(value["injection_point"], "AfterRenderingOpaques");

    let back: PixelationSettings = serde_json::from_value(value).unwrap();
    assert_eq!(back, settings);
}
