use image::RgbaImage;

use mannequin_engine::assets::{MemoryAssets, TextureImage};
use mannequin_engine::avatar::HatDescriptor;
use mannequin_engine::camera::OrbitParams;
use mannequin_engine::paint::Rgb;
use mannequin_engine::render::raster::SoftwareBackend;
use mannequin_engine::scene::{BodyPart, DecalSlot, Dimensions, DrawTag};
use mannequin_engine::{AvatarRenderer, RendererConfig};

const HEAD_OBJ: &str = include_str!("../../../assets/head.obj");

const GREEN: Rgb = Rgb { r: 0.0, g: 1.0, b: 0.0 };

fn assets() -> MemoryAssets {
    MemoryAssets::new()
        .with("head.obj", HEAD_OBJ)
        .with("hat.obj", HEAD_OBJ)
        .with("empty.obj", "# no geometry\no nothing\n")
        .with_texture("blue.png", TextureImage::solid(4, 4, [0, 0, 255, 255]))
        .with_texture("clear.png", TextureImage::solid(4, 4, [255, 0, 0, 0]))
        .with("broken.png", b"\x89PNG but not really".to_vec())
}

fn renderer_with_head(head: Option<&str>) -> AvatarRenderer<SoftwareBackend> {
    let config = RendererConfig {
        width: 96,
        height: 96,
        head_mesh: head.map(str::to_string),
        ..RendererConfig::default()
    };
    AvatarRenderer::new(SoftwareBackend::new(), assets(), config).unwrap()
}

fn renderer() -> AvatarRenderer<SoftwareBackend> {
    renderer_with_head(Some("head.obj"))
}

/// `(old, new)` pairs for every pixel that differs.
fn changed(a: &RgbaImage, b: &RgbaImage) -> Vec<([u8; 4], [u8; 4])> {
    a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).map(|(p, q)| (p.0, q.0)).collect()
}

fn mean_row(img: &RgbaImage, pred: impl Fn([u8; 4]) -> bool) -> f32 {
    let rows: Vec<u32> = img.enumerate_pixels().filter(|(_, _, p)| pred(p.0)).map(|(_, y, _)| y).collect();
    assert!(!rows.is_empty(), "no pixel matched");
    rows.iter().sum::<u32>() as f32 / rows.len() as f32
}

fn is_green(p: [u8; 4]) -> bool {
    p[3] == 255 && p[0] == 0 && p[2] == 0 && p[1] > 0
}

// ── construction ────────────────────────────────────────────────────────

#[test]
fn output_has_configured_size() {
    let config = RendererConfig { width: 40, height: 30, ..RendererConfig::default() };
    let mut r = AvatarRenderer::new(SoftwareBackend::new(), assets(), config).unwrap();
    assert_eq!(r.render().unwrap().dimensions(), (40, 30));
}

#[test]
fn zero_size_is_rejected() {
    let config = RendererConfig { width: 0, ..RendererConfig::default() };
    assert!(AvatarRenderer::new(SoftwareBackend::new(), assets(), config).is_err());
}

#[test]
fn orbit_on_the_up_axis_is_rejected() {
    let orbit = OrbitParams { polar: 0.0, ..OrbitParams::default() };
    let config = RendererConfig { orbit, ..RendererConfig::default() };
    assert!(AvatarRenderer::new(SoftwareBackend::new(), assets(), config).is_err());
}

#[test]
fn missing_or_empty_head_is_absent() {
    assert!(renderer_with_head(Some("missing.obj")).avatar().head_mesh.is_none());
    assert!(renderer_with_head(Some("empty.obj")).avatar().head_mesh.is_none());
    assert!(renderer_with_head(None).avatar().head_mesh.is_none());
    assert!(renderer().avatar().head_mesh.is_some());
}

// ── colors ──────────────────────────────────────────────────────────────

#[test]
fn recoloring_one_part_changes_only_that_part() {
    for part in BodyPart::ALL {
        let mut r = renderer();
        let base = r.avatar().colors.get(part).to_array();
        let before = r.render().unwrap();
        r.set_part_color(part.key(), GREEN);
        let after = r.render().unwrap();

        let diff = changed(&before, &after);
        assert!(!diff.is_empty(), "{part}: nothing changed");
        for (old, new) in diff {
            // A lit shade of the part's own color keeps its equal channels equal.
            for (i, j) in [(0, 1), (0, 2), (1, 2)] {
                if base[i] == base[j] {
                    assert_eq!(old[i], old[j], "{part}: changed pixel was not this part: {old:?}");
                }
            }
            assert!(is_green(new), "{part}: changed pixel is not green: {new:?}");
        }
    }
}

#[test]
fn unknown_part_key_is_ignored() {
    let mut r = renderer();
    let before = r.avatar().clone();
    r.set_part_color("tail", [1.0, 1.0, 1.0]);
    assert_eq!(r.avatar(), &before);
}

// ── decals ──────────────────────────────────────────────────────────────

#[test]
fn decal_on_unsupported_part_is_a_no_op() {
    let mut r = renderer();
    r.set_part_decal("leftArm", "blue.png");
    r.set_part_decal("tail", "blue.png");
    assert_eq!(r.backend().texture_count(), 0);
    assert_eq!(r.avatar().decal(DecalSlot::Head), None);
    assert_eq!(r.avatar().decal(DecalSlot::Torso), None);

    r.set_part_decal("torso", "blue.png");
    assert_eq!(r.backend().texture_count(), 1);
}

#[test]
fn failed_decal_clears_slot_and_releases_old_texture() {
    let mut r = renderer();
    r.set_decal(DecalSlot::Head, "blue.png");
    assert!(r.avatar().head_decal.is_some());

    r.set_decal(DecalSlot::Head, "broken.png");
    assert!(r.avatar().head_decal.is_none());
    assert_eq!(r.backend().texture_count(), 0);
}

#[test]
fn replacing_a_decal_keeps_one_texture_alive() {
    let mut r = renderer();
    r.set_part_decal("torso", "blue.png");
    r.set_part_decal("torso", "clear.png");
    assert_eq!(r.backend().texture_count(), 1);
    r.clear_decal(DecalSlot::Torso);
    assert_eq!(r.backend().texture_count(), 0);
}

#[test]
fn opaque_torso_decal_is_visible() {
    let mut r = renderer();
    let plain = r.render().unwrap();
    r.set_part_decal("torso", "blue.png");
    let decaled = r.render().unwrap();

    let diff = changed(&plain, &decaled);
    assert!(!diff.is_empty());
    for (_, new) in diff {
        assert_eq!((new[0], new[1], new[3]), (0, 0, 255), "not a blue decal pixel: {new:?}");
    }
}

#[test]
fn fully_transparent_decal_changes_nothing() {
    let mut r = renderer();
    let plain = r.render().unwrap();
    r.set_part_decal("torso", "clear.png");
    r.set_part_decal("head", "clear.png");
    assert_eq!(r.render().unwrap(), plain);
}

// ── head ────────────────────────────────────────────────────────────────

#[test]
fn headless_render_differs_only_at_head_pixels() {
    let mut with = renderer();
    let mut without = renderer_with_head(Some("empty.obj"));
    with.set_color(BodyPart::Head, GREEN);
    without.set_color(BodyPart::Head, GREEN);

    let a = with.render().unwrap();
    let b = without.render().unwrap();
    let diff = changed(&a, &b);
    assert!(!diff.is_empty());
    for (headed, _) in diff {
        assert!(is_green(headed), "non-head pixel changed: {headed:?}");
    }
}

#[test]
fn set_head_mesh_replaces_and_releases() {
    let mut r = renderer();
    let meshes = r.backend().mesh_count();
    r.set_head_mesh("head.obj");
    assert_eq!(r.backend().mesh_count(), meshes);
    r.set_head_mesh("missing.obj");
    assert!(r.avatar().head_mesh.is_none());
    assert_eq!(r.backend().mesh_count(), meshes - 1);
}

// ── hats ────────────────────────────────────────────────────────────────

#[test]
fn hat_list_is_replaced_atomically() {
    let mut r = renderer();
    let base = r.backend().mesh_count();

    r.set_hat(vec![
        HatDescriptor::new("hat.obj").with_texture("blue.png"),
        HatDescriptor::new("missing.obj"),
        HatDescriptor::new("hat.obj"),
    ]);
    assert_eq!(r.hats().len(), 3);
    assert!(r.hats()[0].mesh.is_some() && r.hats()[0].texture.is_some());
    assert!(r.hats()[1].mesh.is_none());
    assert_eq!(r.backend().mesh_count(), base + 2);
    assert_eq!(r.backend().texture_count(), 1);

    r.set_hat(HatDescriptor::new("hat.obj"));
    assert_eq!(r.hats().len(), 1);
    assert_eq!(r.backend().mesh_count(), base + 1);
    assert_eq!(r.backend().texture_count(), 0);
}

#[test]
fn hat_defaults_follow_head_color_at_set_time() {
    let mut r = renderer();
    r.set_color(BodyPart::Head, GREEN);
    r.set_hat(HatDescriptor::new("hat.obj"));
    r.set_color(BodyPart::Head, Rgb::new(1.0, 0.0, 1.0));

    let hat = &r.hats()[0];
    assert_eq!(hat.color, GREEN);
    assert_eq!(hat.scale, glam::Vec3::ONE);
    assert_eq!(hat.position, glam::Vec3::ZERO);
}

// ── draw stream ─────────────────────────────────────────────────────────

#[test]
fn draw_order_is_fixed() {
    let mut r = renderer();
    assert_eq!(
        r.draw_list().tags(),
        [
            DrawTag::Torso,
            DrawTag::LeftArm,
            DrawTag::RightArm,
            DrawTag::LeftLeg,
            DrawTag::RightLeg,
            DrawTag::Head,
        ]
    );

    r.set_part_decal("head", "blue.png");
    r.set_part_decal("torso", "blue.png");
    r.set_hat(vec![
        HatDescriptor::new("hat.obj"),
        HatDescriptor::new("missing.obj"),
        HatDescriptor::new("hat.obj"),
    ]);
    assert_eq!(
        r.draw_list().tags(),
        [
            DrawTag::Torso,
            DrawTag::TorsoDecal,
            DrawTag::LeftArm,
            DrawTag::RightArm,
            DrawTag::LeftLeg,
            DrawTag::RightLeg,
            DrawTag::Head,
            DrawTag::HeadDecal,
            DrawTag::Hat(0),
            DrawTag::Hat(2),
        ]
    );
}

#[test]
fn taller_head_moves_head_and_hats_up() {
    let mut r = renderer();
    r.set_hat(HatDescriptor::new("hat.obj").with_position(glam::Vec3::new(0.0, 0.5, 0.0)));
    r.set_dimensions(Dimensions { head: glam::Vec3::new(1.0, 2.0, 1.0), ..Dimensions::default() });

    let list = r.draw_list();
    let y_of = |tag: DrawTag| {
        list.iter().find(|i| i.tag == tag).map(|i| i.cmd.placement().position.y).unwrap()
    };
    assert!((y_of(DrawTag::Head) - 2.2).abs() < 1e-5);
    assert!((y_of(DrawTag::Hat(0)) - 2.7).abs() < 1e-5);
}

// ── output ──────────────────────────────────────────────────────────────

#[test]
fn repeated_renders_are_identical() {
    let mut r = renderer();
    r.set_part_decal("torso", "blue.png");
    r.set_hat(HatDescriptor::new("hat.obj").with_position(glam::Vec3::new(0.0, 0.8, 0.0)));
    let a = r.render().unwrap();
    let b = r.render().unwrap();
    assert_eq!(a, b);
}

#[test]
fn image_is_top_down() {
    let mut r = renderer();
    r.set_color(BodyPart::Head, GREEN);
    let img = r.render().unwrap();

    // Nothing reaches the top edge of the frame.
    assert!((0..img.width()).all(|x| img.get_pixel(x, 0).0[3] == 0));

    let head = mean_row(&img, is_green);
    let torso = mean_row(&img, |p| p[3] == 255 && p[0] > p[1] && p[1] == p[2]);
    assert!(head < torso, "head row {head} should be above torso row {torso}");
}
