use pretty_assertions::assert_eq;
use svg_palette::{
    Color, ColorSet, PaletteError, PaletteReducer, ReduceOptions, extract, find_dominant_colors,
    reduce,
};

const BADGE_SVG: &str = include_str!("fixtures/badge.svg");

fn is_canonical_hex(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A spread of distinct colors large enough to need several batches.
fn gradient_set(n: u32) -> ColorSet {
    (0..n)
        .map(|i| Color::new((i % 256) as u8, ((i / 256) * 60) as u8, ((i * 31) % 256) as u8))
        .collect()
}

#[test]
fn test_extract_fixture_document() {
    let set = extract(BADGE_SVG);
    assert_eq!(
        set.to_hex_strings(),
        vec!["#000000", "#1565c0", "#1e88e5", "#e53935", "#ffffff"]
    );
}

#[test]
fn test_extract_scenario_from_inline_markup() {
    let set = extract("<rect fill='#FF0000'/><rect fill='rgb(0, 255, 0)'/><rect fill='#0000ff'/>");
    let mut hex = set.to_hex_strings();
    hex.sort();
    assert_eq!(hex, vec!["#0000ff", "#00ff00", "#ff0000"]);
}

#[test]
fn test_every_extracted_color_is_canonical() {
    let documents = [
        BADGE_SVG,
        "",
        "#ABCDEF rgb(300, 1, 2) rgb(7,8,9) #abcdef00",
        "<svg style='color:#C0FFEE'>#c0ffee</svg>",
    ];
    for doc in documents {
        for hex in extract(doc).to_hex_strings() {
            assert!(is_canonical_hex(&hex), "{hex:?} from {doc:?}");
        }
    }
}

#[test]
fn test_extract_is_idempotent_on_its_output() {
    let first = extract(BADGE_SVG);
    let rendered = first.to_hex_strings().join(" ");
    let second = extract(&rendered);
    assert_eq!(first, second);
}

#[test]
fn test_malformed_literal_is_not_fatal() {
    let set = extract("<a fill='rgb(abc, def, ghi)'/><b fill='#00ff00'/><c fill='rgb(1,2,3)'/>");
    assert_eq!(set.to_hex_strings(), vec!["#00ff00", "#010203"]);
}

#[test]
fn test_small_sets_take_fast_path() {
    let set = extract("<rect fill='#FF0000'/><rect fill='rgb(0, 255, 0)'/><rect fill='#0000ff'/>");
    let palette = reduce(&set, 5, &ReduceOptions::default()).unwrap();
    assert_eq!(palette.as_slice(), set.as_slice());
}

#[test]
fn test_large_sets_reduce_to_exactly_k() {
    let set = gradient_set(1000);
    assert_eq!(set.len(), 1000);
    for k in [1, 2, 5, 16] {
        let palette = reduce(&set, k, &ReduceOptions::default()).unwrap();
        assert_eq!(palette.len(), k);
        assert!(palette.to_hex_strings().iter().all(|h| is_canonical_hex(h)));
    }
}

#[test]
fn test_reduction_is_reproducible() {
    let set = gradient_set(700);
    let options = ReduceOptions::new().with_batch_size(50).with_seed(1234);
    let a = reduce(&set, 6, &options).unwrap();
    let b = PaletteReducer::new(options).reduce(&set, 6).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_near_red_and_near_blue() {
    let set = extract("#ff0000 #fe0101 #fd0202 #0000ff #0101fe #0202fd");
    let palette = reduce(&set, 2, &ReduceOptions::default()).unwrap();
    assert_eq!(palette.len(), 2);

    let red = Color::new(254, 1, 1);
    let blue = Color::new(1, 1, 254);
    let near = |a: &Color, b: &Color| {
        a.red.abs_diff(b.red) <= 1 && a.green.abs_diff(b.green) <= 1 && a.blue.abs_diff(b.blue) <= 1
    };
    assert!(palette.iter().any(|c| near(c, &red)), "{:?}", palette.to_hex_strings());
    assert!(palette.iter().any(|c| near(c, &blue)), "{:?}", palette.to_hex_strings());
}

#[test]
fn test_matches_full_batch_kmeans_on_separated_clusters() {
    use kmeans_colors::get_kmeans;
    use palette::Srgb;

    // Three tight groups, far apart.
    let anchors = [(230u8, 40u8, 40u8), (40, 200, 60), (30, 60, 220)];
    let colors: ColorSet = anchors
        .iter()
        .flat_map(|&(r, g, b)| {
            (0..5u8).map(move |d| Color::new(r + d, g + d, b.saturating_sub(d)))
        })
        .collect();

    let palette = reduce(&colors, 3, &ReduceOptions::default()).unwrap();
    let mut ours = palette.into_vec();
    ours.sort();

    let buf: Vec<Srgb> = colors
        .iter()
        .map(|&c| Srgb::<u8>::from(c).into_format::<f32>())
        .collect();
    let lloyd = get_kmeans(3, 50, 1e-5, false, &buf, 0);
    let mut theirs: Vec<Color> = lloyd
        .centroids
        .iter()
        .map(|c| Color::from(c.into_format::<u8>()))
        .collect();
    theirs.sort();

    assert_eq!(ours.len(), theirs.len());
    for (a, b) in ours.iter().zip(&theirs) {
        assert!(
            a.red.abs_diff(b.red) <= 1 && a.green.abs_diff(b.green) <= 1 && a.blue.abs_diff(b.blue) <= 1,
            "mini-batch {a} vs full-batch {b}"
        );
    }
}

#[test]
fn test_find_dominant_colors_end_to_end() {
    let palette = find_dominant_colors(BADGE_SVG, 3, &ReduceOptions::default()).unwrap();
    assert_eq!(palette.len(), 3);

    // Centers are means of input colors, so they stay inside the input's bounding box.
    let colors = extract(BADGE_SVG);
    let lo = |f: fn(&Color) -> u8| colors.iter().map(f).min().unwrap();
    let hi = |f: fn(&Color) -> u8| colors.iter().map(f).max().unwrap();
    for c in &palette {
        assert!((lo(|c| c.red)..=hi(|c| c.red)).contains(&c.red), "{c}");
        assert!((lo(|c| c.green)..=hi(|c| c.green)).contains(&c.green), "{c}");
        assert!((lo(|c| c.blue)..=hi(|c| c.blue)).contains(&c.blue), "{c}");
    }
}

#[test]
fn test_invalid_batch_size_is_rejected() {
    let err = find_dominant_colors(BADGE_SVG, 3, &ReduceOptions::new().with_batch_size(0))
        .unwrap_err();
    assert_eq!(
        err,
        PaletteError::InvalidParameter {
            parameter: "batch_size",
            value: "0".to_string()
        }
    );
}

#[test]
fn test_empty_document_gives_empty_palette() {
    let palette = find_dominant_colors("<svg/>", 5, &ReduceOptions::default()).unwrap();
    assert!(palette.is_empty());
}
