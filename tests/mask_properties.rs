//! Property tests for masks, the auto-mask pipeline and routing

use floorplan_nav::core::PixelPoint;
use floorplan_nav::mask::{generate, MaskConfig, WalkMask};
use floorplan_nav::pathfinding::{GridRouter, RouterConfig};
use image::{DynamicImage, GrayImage, Luma};
use proptest::prelude::*;

fn mask_strategy() -> impl Strategy<Value = WalkMask> {
    (1u32..24, 1u32..24).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<bool>(), (w * h) as usize).prop_map(move |cells| {
            let mut mask = WalkMask::new(w, h).unwrap();
            for (i, &walkable) in cells.iter().enumerate() {
                mask.set_walkable(i as i32 % w as i32, i as i32 / w as i32, walkable);
            }
            mask
        })
    })
}

fn gray_strategy() -> impl Strategy<Value = GrayImage> {
    (4u32..32, 4u32..32).prop_flat_map(|(w, h)| {
        proptest::collection::vec(prop_oneof![Just(0u8), Just(255u8), any::<u8>()], (w * h) as usize)
            .prop_map(move |pixels| {
                GrayImage::from_fn(w, h, |x, y| Luma([pixels[(y * w + x) as usize]]))
            })
    })
}

proptest! {
    #[test]
    fn out_of_bounds_reads_blocked_and_writes_ignored(
        mut mask in mask_strategy(),
        dx in 0i32..50,
        dy in -50i32..50,
    ) {
        let before = mask.clone();
        let x = mask.width() as i32 + dx;
        prop_assert!(!mask.is_walkable(x, dy));
        prop_assert!(!mask.is_walkable(-1 - dx, dy));
        mask.set_walkable(x, dy, true);
        mask.set_walkable(-1 - dx, dy, true);
        prop_assert_eq!(mask, before);
    }

    #[test]
    fn clone_is_independent(mut mask in mask_strategy(), x in 0i32..24, y in 0i32..24) {
        let snapshot = mask.clone();
        prop_assert_eq!(&snapshot, &mask);

        let x = x % mask.width() as i32;
        let y = y % mask.height() as i32;
        let value = !mask.is_walkable(x, y);
        mask.set_walkable(x, y, value);
        prop_assert_eq!(snapshot.is_walkable(x, y), !value);
    }

    #[test]
    fn binary_image_round_trip(mask in mask_strategy()) {
        let image = DynamicImage::ImageLuma8(mask.to_binary_image());
        prop_assert_eq!(WalkMask::from_binary_image(&image).unwrap(), mask);
    }

    #[test]
    fn inflate_is_monotonic(image in gray_strategy(), k in 0u32..5, remove_outside in any::<bool>()) {
        let base = MaskConfig {
            threshold: 128,
            inflate_px: k,
            seal_gaps_px: 1,
            remove_outside,
            ..MaskConfig::default()
        };
        let thin = generate(&image, &base).unwrap();
        let thick = generate(&image, &MaskConfig { inflate_px: k + 1, ..base }).unwrap();

        for (a, b) in thin.cells().iter().zip(thick.cells()) {
            prop_assert!(*a || !*b, "inflate_px={} walkable set grew", k + 1);
        }
    }

    #[test]
    fn wall_pixels_never_walkable(image in gray_strategy(), threshold in 1u8..=255) {
        let config = MaskConfig {
            threshold,
            inflate_px: 0,
            seal_gaps_px: 0,
            remove_outside: false,
            ..MaskConfig::default()
        };
        let mask = generate(&image, &config).unwrap();
        for (x, y, pixel) in image.enumerate_pixels() {
            let walkable = mask.is_walkable(x as i32, y as i32);
            prop_assert_eq!(walkable, pixel.0[0] >= threshold);
        }
    }

    #[test]
    fn routes_stay_on_walkable_nodes(
        mask in mask_strategy(),
        stride in 1u32..4,
        diagonal in any::<bool>(),
        coords in (0i32..24, 0i32..24, 0i32..24, 0i32..24),
    ) {
        let (w, h) = (mask.width() as i32, mask.height() as i32);
        let start = PixelPoint::new(coords.0 % w, coords.1 % h);
        let end = PixelPoint::new(coords.2 % w, coords.3 % h);
        let config = RouterConfig { stride, max_expanded_nodes: 100_000, allow_diagonal: diagonal };
        let outcome = GridRouter::new(&mask, config).search(start, end, None);

        if let Some(path) = outcome.path {
            prop_assert_eq!(path.first(), Some(&start));
            prop_assert_eq!(path.last(), Some(&end));
            for w in &path {
                prop_assert!(mask.is_walkable(w.x, w.y));
            }
            for pair in path.windows(2) {
                prop_assert_ne!(pair[0], pair[1]);
            }
        } else {
            let blocked = !mask.is_walkable(start.x, start.y) || !mask.is_walkable(end.x, end.y);
            if blocked {
                prop_assert_eq!(outcome.nodes_expanded, 0);
            }
        }
    }
}
