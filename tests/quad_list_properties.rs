use std::f64::consts::{FRAC_PI_2, TAU};

use proptest::prelude::*;
use quad_batch::basics::RectF;
use quad_batch::{
    quad_type_for_transformed_rect, PerspQuad, Quad, QuadGeometry, QuadList, QuadType,
    TransAffine, TransPerspective,
};

fn scale() -> impl Strategy<Value = f64> {
    (0.01f64..100.0, any::<bool>()).prop_map(|(s, neg)| if neg { -s } else { s })
}

fn rect() -> impl Strategy<Value = RectF> {
    (-1000i32..1000, -1000i32..1000, 1i32..500, 1i32..500).prop_map(|(x, y, w, h)| {
        RectF::new(x as f32, y as f32, (x + w) as f32, (y + h) as f32)
    })
}

fn type_index() -> impl Strategy<Value = QuadType> {
    (0usize..4).prop_map(|i| QuadType::ALL[i])
}

/// A quad whose points classify no higher than `ty`.
fn quad_for(ty: QuadType, i: usize) -> PerspQuad {
    let o = i as f32;
    let r = RectF::new(o, -o, o + 2.0, 3.0 - o);
    if ty.has_perspective() {
        let mut m = TransPerspective::new();
        m.w1 = 0.01;
        PerspQuad::from_transformed_rect(&r, &m)
    } else {
        PerspQuad::from_rect(&r)
    }
}

fn check_invariants(list: &QuadList) {
    if list.quad_type().has_perspective() {
        assert_eq!(list.ws().len(), 4 * list.len());
    } else {
        assert!(list.ws().is_empty());
    }
    for i in 0..list.len() {
        assert!(list.get(i).is_some());
    }
    assert!(list.get(list.len()).is_none());
}

proptest! {
    #[test]
    fn scale_translate_is_rect(
        sx in scale(),
        sy in scale(),
        tx in -1e4f64..1e4,
        ty in -1e4f64..1e4,
    ) {
        let mut m = TransAffine::new_scaling(sx, sy);
        m.translate(tx, ty);
        prop_assert_eq!(quad_type_for_transformed_rect(&m.into()), QuadType::Rect);
    }

    #[test]
    fn rotation_is_rectilinear(
        a in 0.05f64..(FRAC_PI_2 - 0.05),
        quarter in 0u32..4,
        s in 0.01f64..100.0,
        tx in -1e4f64..1e4,
    ) {
        let mut m = TransAffine::new_scaling(s, s);
        m.rotate(a + f64::from(quarter) * FRAC_PI_2).translate(tx, -tx);
        prop_assert_eq!(quad_type_for_transformed_rect(&m.into()), QuadType::Rectilinear);
    }

    #[test]
    fn skew_is_standard(k in 0.1f64..1.2, sx in scale(), sy in scale()) {
        let mut m = TransAffine::new_skewing(k, 0.0);
        m.multiply(&TransAffine::new_scaling(sx, sy));
        prop_assert_eq!(quad_type_for_transformed_rect(&m.into()), QuadType::Standard);
    }

    #[test]
    fn perspective_row_is_perspective(w0 in -0.1f64..0.1, w1 in 0.001f64..0.1, sx in scale()) {
        let mut m = TransPerspective::from(TransAffine::new_scaling(sx, 1.0));
        m.w0 = w0;
        m.w1 = w1;
        prop_assert_eq!(quad_type_for_transformed_rect(&m), QuadType::Perspective);
    }

    #[test]
    fn points_never_exceed_matrix_type(
        r in rect(),
        a in 0.0f64..TAU,
        sx in scale(),
        sy in scale(),
    ) {
        let mut m = TransAffine::new_scaling(sx, sy);
        m.rotate(a);
        let ty = quad_type_for_transformed_rect(&m.into());
        let q = Quad::from_transformed_rect(&r, &m);
        prop_assert!(q.quad_type() <= ty);
    }

    #[test]
    fn offset_skew_points_are_standard(
        t in 0.05f64..1.0,
        w in 1.0f32..10.0,
        h in 1.0f32..10.0,
        tx in -1e4f64..1e4,
        ty in -1e4f64..1e4,
    ) {
        let mut m = TransAffine::new_skewing(t.atan(), 0.0);
        m.translate(tx, ty);
        let q = Quad::from_transformed_rect(&RectF::new(0.0, 0.0, w, h), &m);
        prop_assert_eq!(q.quad_type(), QuadType::Standard);
    }

    #[test]
    fn tracked_type_is_running_max(
        ops in prop::collection::vec((type_index(), any::<bool>()), 0..40),
    ) {
        let mut list = QuadList::new();
        let mut expected = QuadType::Rect;
        for (i, (ty, via_concat)) in ops.into_iter().enumerate() {
            let q = quad_for(ty, i);
            if via_concat {
                let mut other = QuadList::new();
                other.push_back(&q, ty);
                list.concat(&other);
            } else {
                list.push_back(&q, ty);
            }
            expected = expected.max(ty);
            prop_assert_eq!(list.quad_type(), expected);
            prop_assert_eq!(list.len(), i + 1);
            check_invariants(&list);
        }
    }

    #[test]
    fn two_d_quads_read_back_with_unit_w(
        rects in prop::collection::vec(rect(), 1..20),
        persp_at in prop::option::of(0usize..20),
    ) {
        let mut list = QuadList::new();
        for (i, r) in rects.iter().enumerate() {
            if persp_at == Some(i) {
                list.push_back(&quad_for(QuadType::Perspective, i), QuadType::Perspective);
            }
            list.push_back(&Quad::from_rect(r), QuadType::Rect);
        }
        check_invariants(&list);

        let plain: Vec<PerspQuad> = list.iter().filter(|q| !q.has_perspective()).collect();
        prop_assert_eq!(plain.len(), rects.len());
        for (q, r) in plain.iter().zip(&rects) {
            prop_assert_eq!(*q, PerspQuad::from_rect(r));
        }
    }

    #[test]
    fn scaled_w_bounds_match_projection(
        r in rect(),
        k in prop::sample::select(vec![0.5f32, 2.0, 4.0, 8.0]),
    ) {
        let base = PerspQuad::from_rect(&r);
        let scaled = PerspQuad::new(
            base.xs().map(|x| x * k),
            base.ys().map(|y| y * k),
            [k; 4],
        );
        prop_assert_eq!(scaled.bounds(QuadType::Perspective), Quad::from_rect(&r).bounds());
    }
}

#[test]
fn concat_rect_and_perspective_lists() {
    let mut rects = QuadList::new();
    for i in 0..3 {
        rects.push_back(&quad_for(QuadType::Rect, i), QuadType::Rect);
    }
    let mut persp = QuadList::new();
    let p0 = quad_for(QuadType::Perspective, 10);
    let p1 = quad_for(QuadType::Perspective, 11);
    persp.push_back(&p0, QuadType::Perspective);
    persp.push_back(&p1, QuadType::Perspective);

    rects.concat(&persp);
    assert_eq!(rects.len(), 5);
    assert_eq!(rects.quad_type(), QuadType::Perspective);
    for i in 0..3 {
        assert_eq!(*rects.quad(i).ws().unwrap(), [1.0; 4]);
    }
    assert_eq!(rects.quad(3), p0);
    assert_eq!(rects.quad(4), p1);
}
