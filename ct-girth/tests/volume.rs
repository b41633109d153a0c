use ct_girth::phantom;
use ct_girth::prelude::*;
use ct_girth::ssde::{self, ReferencePhantom};
use float_eq::assert_float_eq;
use ndarray::{s, Array2, Array3};

fn init_logger() {
    let _ = simple_logger::init_with_level(log::Level::Debug);
}

/// 模拟一个简单的腹部序列: 椭圆形体部, 其中有一块更致密的区域, 周围是空气.
fn abdomen(n: usize, spacing: VoxelSpacing) -> CtSeries {
    let shape = (96, 128);
    let slices: Vec<_> = (0..n)
        .map(|z| {
            let body = phantom::ellipse(shape, (48.0, 64.0), (50.0 - z as f64, 35.0), 0.0);
            let mut scan = phantom::uniform_scan(shape, -1000.0);
            scan.zip_mut_with(&body, |v, &inside| {
                if inside {
                    *v = 40.0;
                }
            });
            scan.slice_mut(s![40..56, 50..70]).fill(400.0);
            (scan, body)
        })
        .collect();
    phantom::stack(&slices, spacing).unwrap()
}

#[test]
fn test_abdomen_volume() {
    init_logger();
    let sp = VoxelSpacing::new(0.7, 0.7).unwrap().with_z(5.0).unwrap();
    let series = abdomen(4, sp);
    let r = calculate_area_equivalent_diameter(&series, true, true).unwrap();
    assert_eq!(r.len(), 4);

    let radon = r.radon().unwrap();
    let hough = r.hough().unwrap();
    assert_eq!(radon, hough);

    for (eq, sino) in r.equivalent().iter().zip(radon) {
        // 单位换算统一使用 x 方向分辨率.
        assert_float_eq!(eq.ead_cm(), eq.ead_px() * 0.07, abs <= 1e-9);
        assert_float_eq!(eq.wed_cm(), eq.wed_px() * 0.07, abs <= 1e-9);
        assert_float_eq!(eq.eed_cm(), eq.eed_px() * 0.07, abs <= 1e-9);
        assert_float_eq!(sino.max_cm(), sino.max_pixels() as f64 * 0.07, abs <= 1e-9);
        assert_float_eq!(
            sino.equivalent_diameter(),
            (sino.max_cm() * sino.min_cm()).sqrt(),
            abs <= 1e-12
        );

        // 体部比水略致密, 又含有高密度区域.
        assert!(eq.wed_cm() > eq.ead_cm());
        assert!(eq.mean_hu() > 40.0);
        assert_eq!(eq.median_hu(), 40.0);

        // 轴对齐的椭圆: 最宽方向为水平方向.
        assert_eq!(sino.max_angle(), 0.0);
        assert_float_eq!(sino.max_cm(), eq.lat_cm(), abs <= 1e-9);
        assert!(ssde::ssde(10.0, eq.wed_cm(), ReferencePhantom::Body32).is_some());
    }

    // 体部逐层变窄.
    let lat: Vec<_> = r.equivalent().iter().map(|e| e.lat_cm()).collect();
    assert!(lat.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_empty_slice_reports_index() {
    init_logger();
    let shape = (32, 32);
    let scan = Array3::<f32>::zeros((3, 32, 32));
    let mut mask = Array3::<bool>::default((3, 32, 32));
    mask.slice_mut(s![0, .., ..])
        .assign(&phantom::rectangle(shape, (4, 4), (10, 12)));
    mask.slice_mut(s![1, .., ..])
        .assign(&phantom::rectangle(shape, (4, 4), (10, 12)));
    let sp = VoxelSpacing::new(1.0, 1.0).unwrap();
    let series = CtSeries::new(scan, mask, vec![sp; 3]).unwrap();

    let e = calculate_area_equivalent_diameter(&series, false, true).unwrap_err();
    assert_eq!(e.slice_index(), Some(2));
    assert_eq!(e.kind(), ErrorKind::DegenerateInput);
}

#[test]
fn test_hwz_layout() {
    // (h, w, z) 排布的输入与 (z, h, w) 排布的结果相同.
    let sp = VoxelSpacing::new(0.8, 0.8).unwrap();
    let zhw = abdomen(2, sp);
    let hwz_scan = zhw.scan().permuted_axes([1, 2, 0]).to_owned();
    let hwz_mask = zhw.mask().permuted_axes([1, 2, 0]).to_owned();
    let from_hwz = CtSeries::from_hwz(hwz_scan, hwz_mask, vec![sp; 2]).unwrap();

    let a = calculate_area_equivalent_diameter(&zhw, true, false).unwrap();
    let b = calculate_area_equivalent_diameter(&from_hwz, true, false).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_custom_sweep() {
    let sp = VoxelSpacing::new(1.0, 1.0).unwrap();
    let mut m = Array2::<bool>::default((30, 30));
    m.slice_mut(s![5..25, 10..16]).fill(true);
    let mask = MaskSlice::new(m.view());

    let coarse = RadonProjector::new(AngleSweep::new(45.0).unwrap());
    let d = coarse.analyze(&mask, &sp).unwrap();
    assert_eq!(coarse.widths(&mask).unwrap().len(), 4);
    assert_eq!(d.min_angle(), 0.0);
    assert_eq!(d.min_pixels(), 6);
    assert_eq!(d.max_angle(), 90.0);
    assert_eq!(d.max_pixels(), 20);

    let config = DiameterConfig::new(true, true).with_sweep(AngleSweep::new(45.0).unwrap());
    let scan = Array2::<f32>::zeros((30, 30));
    let out = DiameterPipeline::new(&config)
        .slice(&ScanSlice::new(scan.view()), &mask, &sp)
        .unwrap();
    assert_eq!(out.radon(), Some(&d));
    assert_eq!(out.hough(), Some(&d));
}

#[test]
fn test_anisotropic_spacing() {
    init_logger();
    // 8 行 x 20 列的矩形, 像素宽 0.5 mm, 高 2 mm.
    let sp = VoxelSpacing::new(0.5, 2.0).unwrap();
    let shape = (32, 32);
    let slices = vec![(
        phantom::uniform_scan(shape, 0.0),
        phantom::rectangle(shape, (10, 4), (8, 20)),
    )];
    let series = phantom::stack(&slices, sp).unwrap();
    let r = calculate_area_equivalent_diameter(&series, true, true).unwrap();

    let eq = &r.equivalent()[0];
    assert_float_eq!(eq.lat_cm(), 20.0 * 0.05, abs <= 1e-12);
    assert_float_eq!(eq.ap_cm(), 8.0 * 0.2, abs <= 1e-12);
    assert_float_eq!(eq.ead_cm(), eq.ead_px() * 0.05, abs <= 1e-12);
    assert_float_eq!(eq.wed_cm(), eq.wed_px() * 0.05, abs <= 1e-12);
    assert_float_eq!(eq.eed_cm(), (1.0f64 * 1.6).sqrt(), abs <= 1e-12);
    assert_float_eq!(eq.eed_px(), eq.eed_cm() * 10.0 / 0.5, abs <= 1e-9);

    // 投影宽度按像素计数, 统一以 x 方向分辨率换算.
    for sino in [&r.radon().unwrap()[0], &r.hough().unwrap()[0]] {
        assert_eq!((sino.min_angle(), sino.min_pixels()), (90.0, 8));
        assert_float_eq!(sino.min_cm(), 8.0 * 0.05, abs <= 1e-12);
        assert_float_eq!(sino.max_cm(), sino.max_pixels() as f64 * 0.05, abs <= 1e-12);
        assert_float_eq!(
            sino.equivalent_diameter(),
            (sino.max_cm() * sino.min_cm()).sqrt(),
            abs <= 1e-12
        );
    }
}
