//! Integration tests: generate synthetic tank scans with known geometry, noise,
//! dents, and outliers, and verify the fitting pipeline recovers them.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rand_distr::{Distribution, Normal};
use shellfit::{
    analyze, fit_circle, load_scan_from_file, unroll, AnalysisConfig, Circle, CircleFitConfig,
    ColoredPoint, FitError, Point3D, PointCollection, Rgb, ScanPoint, ZBand,
};

const X0: f64 = 12.3;
const Y0: f64 = -4.1;
const RADIUS: f64 = 10.0;

/// Dent centered at azimuth 1.0 rad, height 4.0, depth 0.05.
fn dent(theta: f64, z: f64) -> f64 {
    let da = (theta - 1.0) * RADIUS;
    let dz = z - 4.0;
    -0.05 * (-(da * da + dz * dz) / (2.0 * 0.6 * 0.6)).exp()
}

/// Synthetic tank wall with Gaussian noise, one dent, a floor, and spray
/// outside the shell.
fn synthetic_tank(rng: &mut StdRng, n_wall: usize, sigma: f64) -> PointCollection<ColoredPoint> {
    let noise = Normal::new(0.0, sigma).unwrap();
    let mut scan = PointCollection::new("SyntheticTank");

    for _ in 0..n_wall {
        let theta = rng.random::<f64>() * TAU;
        let z = 0.2 + rng.random::<f64>() * 7.6;
        let r = RADIUS + dent(theta, z) + noise.sample(rng);
        let p = Point3D::new(X0 + r * theta.cos(), Y0 + r * theta.sin(), z).unwrap();
        scan.push(ColoredPoint::new(p, Some(Rgb::new(180, 180, 180))));
    }

    // Floor disc at z ~ 0, removed by the height band
    for _ in 0..n_wall / 10 {
        let theta = rng.random::<f64>() * TAU;
        let r = rng.random::<f64>().sqrt() * RADIUS;
        let z = noise.sample(rng);
        let p = Point3D::new(X0 + r * theta.cos(), Y0 + r * theta.sin(), z).unwrap();
        scan.push(ColoredPoint::new(p, Some(Rgb::new(90, 60, 30))));
    }

    // Spray and fittings outside the wall
    for _ in 0..n_wall / 100 {
        let theta = rng.random::<f64>() * TAU;
        let z = 1.0 + rng.random::<f64>() * 6.0;
        let r = RADIUS + 0.5 + rng.random::<f64>() * 1.5;
        let p = Point3D::new(X0 + r * theta.cos(), Y0 + r * theta.sin(), z).unwrap();
        scan.push(ColoredPoint::new(p, Some(Rgb::new(255, 0, 0))));
    }

    scan
}

#[test]
fn test_noisy_circle_convergence() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let mut rng = StdRng::seed_from_u64(7);
    let sigma = 0.002;
    let noise = Normal::new(0.0, sigma).unwrap();
    let points: Vec<Point3D> = (0..500)
        .map(|_| {
            let t = rng.random::<f64>() * TAU;
            let r = RADIUS + noise.sample(&mut rng);
            Point3D::new(X0 + r * t.cos(), Y0 + r * t.sin(), 0.0).unwrap()
        })
        .collect();

    let guess = Circle::new(X0 + 0.7, Y0 - 0.4, RADIUS * 0.9);
    let fit = fit_circle(&guess, &points, &CircleFitConfig::default()).unwrap();

    println!(
        "Noisy circle: {} in {} iterations (truth x0={}, y0={}, r={})",
        fit.circle, fit.iterations, X0, Y0, RADIUS
    );
    assert!(fit.converged);
    assert!(fit.iterations <= 50);
    assert!((fit.circle.x0 - X0).abs() < 1e-3);
    assert!((fit.circle.y0 - Y0).abs() < 1e-3);
    assert!((fit.circle.r - RADIUS).abs() < 1e-3);

    // Corrections shrink once the solver is in the basin
    let n = fit.corrections.len();
    assert!(fit.corrections[n - 1].amax() < fit.corrections[0].amax());
}

#[test]
fn test_full_pipeline_on_synthetic_tank() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let mut rng = StdRng::seed_from_u64(2025);
    let scan = synthetic_tank(&mut rng, 12000, 0.003);
    let n_raw = scan.len();

    let config = AnalysisConfig {
        z_band: Some(ZBand {
            z_min: 0.1,
            z_max: 7.9,
        }),
        ..Default::default()
    };
    let analysis = analyze(scan, &config).unwrap();
    let stats = *analysis.deformation.stats();

    println!("Raw points: {n_raw}");
    println!("Fitted: {}", analysis.cylinder);
    println!("Stats: {stats}");
    for r in &analysis.report.rounds {
        println!(
            "  stage {} tol {:.3} {:?}: R={:.5} retained {} rejected {}",
            r.stage, r.tolerance, r.mode, r.radius, r.retained, r.rejected
        );
    }

    assert!(analysis.report.converged);
    assert!((analysis.cylinder.x0() - X0).abs() < 3e-3);
    assert!((analysis.cylinder.y0() - Y0).abs() < 3e-3);
    assert!((analysis.cylinder.r() - RADIUS).abs() < 3e-3);
    assert!(analysis.cylinder.z_min() > 0.1 && analysis.cylinder.z_max() < 7.9);

    // Radius has settled by the last round
    assert!(analysis.report.radius_change.unwrap() < 1e-4);
    for pair in analysis.report.rounds.windows(2) {
        assert!(pair[1].tolerance <= pair[0].tolerance);
    }

    // Nearly all of the wall survives; no spray does
    let retained = analysis.deformation.points();
    assert!(retained.len() > 11500, "retained {}", retained.len());
    assert!(retained.iter().all(|p| p.color() != Some(Rgb::new(255, 0, 0))));
    assert!(retained.iter().all(|p| p.color() != Some(Rgb::new(90, 60, 30))));

    // The dent is the deepest feature and survives the outside-only stage
    assert!(
        stats.min_deformation < -0.035 && stats.min_deformation > -0.075,
        "min deformation {}",
        stats.min_deformation
    );
    assert!(stats.max_deformation < 0.045);
    assert!(stats.rms_deformation < 0.01);
}

#[test]
fn test_unrolled_tank_spans_circumference() {
    let mut rng = StdRng::seed_from_u64(99);
    let scan = synthetic_tank(&mut rng, 3000, 0.002);
    let config = AnalysisConfig {
        z_band: Some(ZBand {
            z_min: 0.1,
            z_max: 7.9,
        }),
        ..Default::default()
    };
    let analysis = analyze(scan, &config).unwrap();
    let flat = unroll(&analysis.deformation, &analysis.cylinder).unwrap();

    assert_eq!(flat.len(), analysis.deformation.points().len());
    assert_eq!(flat.name(), "SyntheticTank_unrolled");

    let b = flat.bounds().unwrap();
    let circumference = TAU * analysis.cylinder.r();
    assert!(b.y_min >= 0.0 && b.y_max < circumference);
    assert!(b.y_max > 0.95 * circumference);
    assert!((b.x_min - analysis.cylinder.z_min()).abs() < 1e-12);
    assert!((b.x_max - analysis.cylinder.z_max()).abs() < 1e-12);
    assert!((b.z_min - analysis.deformation.stats().min_deformation).abs() < 1e-12);
    assert!((b.z_max - analysis.deformation.stats().max_deformation).abs() < 1e-12);
}

#[test]
fn test_load_and_analyze_from_file() {
    let mut rng = StdRng::seed_from_u64(5);
    let noise = Normal::new(0.0, 0.001).unwrap();
    let mut text = String::from("# x y z r g b\n");
    for i in 0..720 {
        let t = i as f64 / 720.0 * TAU;
        let z = 1.0 + (i % 9) as f64 * 0.5;
        let r = 4.0 + noise.sample(&mut rng);
        text.push_str(&format!(
            "{:.6} {:.6} {:.3} 10 20 30\n",
            r * t.cos(),
            r * t.sin(),
            z
        ));
    }

    let path = std::env::temp_dir().join(format!("shellfit_ring_{}.txt", std::process::id()));
    std::fs::write(&path, text).unwrap();
    let scan = load_scan_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(scan.len(), 720);
    assert!(scan.name().starts_with("shellfit_ring_"));

    let analysis = analyze(scan, &AnalysisConfig::default()).unwrap();
    assert!((analysis.cylinder.r() - 4.0).abs() < 1e-3);
    assert!(analysis.cylinder.x0().abs() < 1e-3);
    assert_eq!(analysis.cylinder.z_min(), 1.0);
    assert_eq!(analysis.cylinder.z_max(), 5.0);
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_scan_from_file("/nonexistent/shellfit/scan.txt").unwrap_err();
    assert!(format!("{err:#}").contains("failed to read scan file"));
}

#[test]
fn test_degenerate_scans_are_rejected() {
    let p = Point3D::new(3.0, 3.0, 1.0).unwrap();
    let same = PointCollection::from_points("same", vec![p; 20]);
    let err = analyze(same, &AnalysisConfig::default()).unwrap_err();
    assert!(
        matches!(err, FitError::SingularSystem(_) | FitError::DegenerateGeometry(_)),
        "{err}"
    );

    let two = PointCollection::from_points(
        "two",
        vec![
            Point3D::new(1.0, 0.0, 0.0).unwrap(),
            Point3D::new(-1.0, 0.0, 0.0).unwrap(),
        ],
    );
    let err = analyze(two, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, FitError::SingularSystem(_)), "{err}");
}
