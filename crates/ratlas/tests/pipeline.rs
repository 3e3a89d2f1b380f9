//! Integration tests - build, persist, reload, rescale
//!
//! Tests the complete workflow: characters → metrics → packed sheets →
//! atlas file + PNG sheets → reloaded atlas

mod common;

use common::{scratch_dir, BoxFont};
use ratlas::{layout_text, Atlas, AtlasConfig, AtlasError, GlyphItem, ImageSheet, LayoutOptions};

fn build(chars: impl IntoIterator<Item = char>, config: &AtlasConfig) -> Atlas {
    Atlas::build_with_provider(Box::new(BoxFont), config, chars).unwrap()
}

/// Pixel rectangles of every placed glyph on `sheet`
fn rects_on(atlas: &Atlas, sheet: usize) -> Vec<(char, f32, f32, f32, f32)> {
    atlas
        .items()
        .filter(|item| item.sheet_index == sheet)
        .map(|item| {
            let p = item.placement.unwrap();
            (item.character, p.x, p.y, item.width, item.height)
        })
        .collect()
}

// ============================================================================
// BUILD
// ============================================================================

#[test]
fn test_two_letters_and_space() {
    let config = AtlasConfig::default().with_sheet_size(64, 64).with_padding(1);
    let atlas = build(['A', 'B', ' '], &config);

    assert_eq!(atlas.len(), 3);
    assert_eq!(atlas.sheets().len(), 1);

    let space = atlas.get(' ').unwrap();
    assert!(space.advance > 0.0);
    assert_eq!((space.width, space.height), (2.0, 2.0));
}

#[test]
fn test_small_set_fits_one_sheet() {
    let config = AtlasConfig::default().with_sheet_size(256, 256).with_padding(2);
    let atlas = build('!'..='~', &config);

    assert_eq!(atlas.len(), 94);
    assert_eq!(atlas.sheets().len(), 1);
}

#[test]
fn test_five_hundred_characters_span_sheets() {
    let chars: Vec<char> = (0x100u32..0x100 + 500).filter_map(char::from_u32).collect();
    assert_eq!(chars.len(), 500);

    let config = AtlasConfig::default().with_sheet_size(32, 32).with_padding(1);
    let atlas = build(chars.iter().copied(), &config);

    assert!(atlas.sheets().len() > 1);
    assert_eq!(atlas.len(), 500);
    for c in &chars {
        let item = atlas.get(*c).unwrap();
        assert!(item.sheet_index < atlas.sheets().len());
        assert!(item.placement.is_some());
    }
    // No sheet is left empty
    for sheet in 0..atlas.sheets().len() {
        assert!(!rects_on(&atlas, sheet).is_empty(), "sheet {} is empty", sheet);
    }
}

#[test]
fn test_placements_in_bounds_and_disjoint() {
    let config = AtlasConfig::default().with_sheet_size(48, 40).with_padding(1);
    let atlas = build('A'..='z', &config);

    for sheet in 0..atlas.sheets().len() {
        let rects = rects_on(&atlas, sheet);
        for &(c, x, y, w, h) in &rects {
            assert!(x + w <= 48.0 && y + h <= 40.0, "{:?} out of bounds", c);
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let overlap = a.1 < b.1 + b.3 && b.1 < a.1 + a.3 && a.2 < b.2 + b.4 && b.2 < a.2 + a.4;
                assert!(!overlap, "{:?} overlaps {:?}", a.0, b.0);
            }
        }
    }
}

#[test]
fn test_uv_matches_placement() {
    let config = AtlasConfig::default().with_sheet_size(64, 32).with_padding(1);
    let atlas = build("Typography".chars(), &config);

    for item in atlas.items() {
        let p = item.placement.unwrap();
        assert_eq!(item.uv_x, p.x / 64.0);
        assert_eq!(item.uv_y, p.y / 32.0);
        assert_eq!(item.uv_width, item.width / 64.0);
        assert_eq!(item.uv_height, item.height / 32.0);
    }
}

#[test]
fn test_ink_lands_inside_padding() {
    let config = AtlasConfig::default().with_sheet_size(32, 32).with_padding(3);
    let atlas = build(['H'], &config);

    let item = atlas.get('H').unwrap();
    let p = item.placement.unwrap();
    let sheet = atlas.sheet(item.sheet_index).unwrap();
    let (x, y) = (p.x as u32, p.y as u32);

    assert_eq!(sheet.pixel(x + 2, y + 2), Some(0));
    assert_eq!(sheet.pixel(x + 3, y + 3), Some(200));
    assert_eq!(sheet.pixel(x + item.width as u32 - 3, y + item.height as u32 - 3), Some(0));
    assert_eq!(sheet.pixel(x + item.width as u32 - 4, y + item.height as u32 - 4), Some(200));
}

#[test]
fn test_descender_metrics() {
    let config = AtlasConfig::default().with_sheet_size(64, 64).with_padding(1);
    let atlas = build(['1', 'a'], &config);

    // '1' hangs 2px below the baseline, 'a' sits on it
    assert_eq!(atlas.get('1').unwrap().descent, 3.0);
    assert_eq!(atlas.get('a').unwrap().descent, 1.0);
}

#[test]
fn test_oversized_glyph_fails_fast() {
    let config = AtlasConfig::default().with_sheet_size(8, 8).with_padding(2);
    let result = Atlas::build_with_provider(Box::new(BoxFont), &config, "ab".chars());

    match result {
        Err(AtlasError::UnplaceableGlyph { character, sheet_width, sheet_height, .. }) => {
            assert_eq!(character, 'a');
            assert_eq!((sheet_width, sheet_height), (8, 8));
        }
        other => panic!("expected UnplaceableGlyph, got {:?}", other),
    }
}

// ============================================================================
// PERSISTENCE
// ============================================================================

#[test]
fn test_save_and_load_round_trip() {
    let dir = scratch_dir("round-trip");
    let config = AtlasConfig::default().with_sheet_size(32, 32).with_padding(1);
    let built = build("The quick brown fox".chars(), &config);

    let atlas_path = dir.join("font.ratlas");
    built.save(&atlas_path).unwrap();
    let sheet_paths = built.save_sheets(dir.join("font")).unwrap();
    assert_eq!(sheet_paths.len(), built.sheets().len());
    assert!(sheet_paths[0].ends_with("font-0.png"));

    let loaded = Atlas::load(&atlas_path, &sheet_paths).unwrap();
    assert!(!loaded.has_font());
    assert_eq!(loaded.font_point_size(), built.font_point_size());
    assert_eq!(loaded.resolution(), built.resolution());
    assert_eq!(loaded.padding(), built.padding());
    assert_eq!(loaded.len(), built.len());
    for item in built.items() {
        let expected = GlyphItem { placement: None, ..item.clone() };
        assert_eq!(loaded.get(item.character), Some(&expected));
    }
    assert_eq!(loaded.sheets(), built.sheets());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_without_sheets() {
    let dir = scratch_dir("no-sheets");
    let config = AtlasConfig::default().with_sheet_size(64, 64);
    let atlas_path = dir.join("font.ratlas");
    build("abc".chars(), &config).save(&atlas_path).unwrap();

    let loaded = Atlas::load(&atlas_path, std::iter::empty::<&str>()).unwrap();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.sheets().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_missing_atlas_file() {
    let dir = scratch_dir("missing");
    let path = dir.join("nope.ratlas");

    match Atlas::load(&path, std::iter::empty::<&str>()) {
        Err(AtlasError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {:?}", other),
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_missing_sheet_file() {
    let dir = scratch_dir("missing-sheet");
    let config = AtlasConfig::default().with_sheet_size(64, 64);
    let atlas_path = dir.join("font.ratlas");
    build("abc".chars(), &config).save(&atlas_path).unwrap();

    let result = Atlas::load(&atlas_path, [dir.join("font-0.png")]);
    assert!(matches!(result, Err(AtlasError::Io { .. })));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_resized_sheet_file() {
    let dir = scratch_dir("resized-sheet");
    let config = AtlasConfig::default().with_sheet_size(64, 64).with_padding(2);
    let built = build("abc".chars(), &config);
    let atlas_path = dir.join("font.ratlas");
    built.save(&atlas_path).unwrap();

    // A sheet resized without rescaling the atlas
    let sheet_path = dir.join("font-0.png");
    ImageSheet::new(128, 128).save(&sheet_path).unwrap();

    match Atlas::load(&atlas_path, [&sheet_path]) {
        Err(AtlasError::SheetMismatch { sheet_index, width, height, .. }) => {
            assert_eq!((sheet_index, width, height), (0, 128, 128));
        }
        other => panic!("expected SheetMismatch, got {:?}", other),
    }

    // Rescaling first makes the same file fit
    let mut atlas = Atlas::load(&atlas_path, std::iter::empty::<&str>()).unwrap();
    atlas.rescale(2.0).unwrap();
    atlas.load_sheets([&sheet_path]).unwrap();
    assert_eq!(atlas.sheets().len(), 1);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_missing_sheet_index() {
    let dir = scratch_dir("sheet-count");
    let config = AtlasConfig::default().with_sheet_size(24, 24).with_padding(1);
    let built = build('A'..='Z', &config);
    assert!(built.sheets().len() > 1);

    let atlas_path = dir.join("font.ratlas");
    built.save(&atlas_path).unwrap();
    let sheet_paths = built.save_sheets(dir.join("font")).unwrap();

    let result = Atlas::load(&atlas_path, &sheet_paths[..1]);
    assert!(matches!(result, Err(AtlasError::MissingSheet { sheets: 1, .. })));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_corrupt_atlas_file() {
    let dir = scratch_dir("corrupt");
    let config = AtlasConfig::default().with_sheet_size(64, 64);
    let atlas_path = dir.join("font.ratlas");
    build("abc".chars(), &config).save(&atlas_path).unwrap();

    let mut bytes = std::fs::read(&atlas_path).unwrap();
    bytes.truncate(bytes.len() / 2);
    std::fs::write(&atlas_path, &bytes).unwrap();

    let result = Atlas::load(&atlas_path, std::iter::empty::<&str>());
    assert!(matches!(result, Err(AtlasError::Serialization(_))));

    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================================
// RELOADED USE
// ============================================================================

#[test]
fn test_reloaded_atlas_lays_out_after_attach() {
    let config = AtlasConfig::default().with_sheet_size(64, 64).with_padding(0);
    let built = build("To".chars(), &config);

    let mut loaded = Atlas::from_bytes(&built.to_bytes()).unwrap();
    assert!(layout_text(&loaded, "To", &LayoutOptions::default()).is_err());

    loaded.attach_provider(Box::new(BoxFont));
    assert_eq!(loaded.kerning('T', 'o').unwrap(), -2.0);

    let from_built = layout_text(&built, "To", &LayoutOptions::default()).unwrap();
    let from_loaded = layout_text(&loaded, "To", &LayoutOptions::default()).unwrap();
    assert_eq!(from_built, from_loaded);
}

#[test]
fn test_rescale_after_reload() {
    let config = AtlasConfig::default().with_sheet_size(64, 64).with_padding(2);
    let built = build("xyz".chars(), &config);

    let mut loaded = Atlas::from_bytes(&built.to_bytes()).unwrap();
    loaded.rescale(0.5).unwrap();

    assert_eq!(loaded.font_point_size(), built.font_point_size() * 0.5);
    assert_eq!(loaded.padding(), 1.0);
    for item in built.items() {
        let scaled = loaded.get(item.character).unwrap();
        assert_eq!(scaled.width, item.width * 0.5);
        assert_eq!(scaled.height, item.height * 0.5);
        assert_eq!(scaled.advance, item.advance * 0.5);
        assert_eq!(scaled.uv_width, item.uv_width);
        assert!(scaled.placement.is_none());
    }
}
