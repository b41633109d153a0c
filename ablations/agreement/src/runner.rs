//! 程序运行函数.

use crate::profile::Profile;
use crate::result::AblationResult;
use ct_girth::diameter::slice_equivalent_diameter;
use ct_girth::projection::{AngularProjection, HoughProjector, RadonProjector};
use ct_girth::volume::relative_difference;
use ct_girth::{MaskSlice, ScanSlice};
use std::thread;
use utils::cases;

/// 在所有用例上运行 `projector`.
fn profile_of(projector: &dyn AngularProjection, size: usize) -> Profile {
    let mut profile = Profile::new();
    for case in cases::ellipse_cases(size) {
        let mask = MaskSlice::new(case.mask.view());
        let scan = ScanSlice::new(case.scan.view());

        profile.case_start();
        let result = projector.analyze(&mask, &case.spacing);
        profile.case_elapsed();

        let d = match result {
            Ok(d) => d,
            Err(e) => {
                log::error!("{}: {e}", case.name);
                profile.count_failure();
                continue;
            }
        };
        let analytic = relative_difference(d.equivalent_diameter(), case.analytic_diameter_cm());
        let eed = slice_equivalent_diameter(&scan, &mask, &case.spacing)
            .map(|eq| relative_difference(d.equivalent_diameter(), eq.eed_cm()))
            .unwrap_or(f64::NAN);
        let angle = (d.max_angle() - case.angle).abs();
        let angle = angle.min(180.0 - angle);
        log::debug!(
            "{}: max {} px @ {}°, min {} px @ {}°",
            case.name,
            d.max_pixels(),
            d.max_angle(),
            d.min_pixels(),
            d.min_angle()
        );
        profile.count_case(analytic, eed, angle);
    }
    profile.finish()
}

/// 实际运行.
pub fn run() -> AblationResult {
    let size = cases::image_size_from_env_or_default();
    log::info!(
        "Running agreement study on {} cases ({size}x{size}, {} cpus)...",
        cases::case_count(),
        utils::cpus()
    );

    let radon = RadonProjector::default();
    let hough = HoughProjector::default();
    thread::scope(|s| {
        let projectors: [&dyn AngularProjection; 2] = [&radon, &hough];
        let handles = projectors.map(|p| s.spawn(move || profile_of(p, size)));

        AblationResult::from_iter(
            projectors.into_iter().map(|p| p.method().name()).zip(
                handles
                    .into_iter()
                    .map(|th| th.join().expect("Thread joining error")),
            ),
        )
    })
}
