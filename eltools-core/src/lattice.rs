//! # Lattice View Module
//!
//! Projects the magnet profile of a beamline onto its floor coordinates,
//! giving a top view of the machine where each magnet bulges sideways
//! from the reference orbit in proportion to its profile value.

use tracing::debug;

use crate::error::Result;
use crate::interp::Interp1d;
use crate::table::Table;

/// Sideways extent of an element with profile value 1, in metres.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 0.5;

/// Moves a profile value from the local frame into floor coordinates.
///
/// The local normal at yaw angle `theta` is `(cos θ, -sin θ)` in the
/// `(X, Z)` plane. The returned point is the reference position
/// `(x0, z0)` displaced by `width * profile` along that normal.
pub fn project(x0: f64, z0: f64, theta: f64, profile: f64, width: f64) -> (f64, f64) {
    let offset = width * profile;
    let nx = theta.cos();
    let nz = -theta.sin();
    (x0 + offset * nx, z0 + offset * nz)
}

/// Adds `X` and `Z` columns to a magnet profile table.
///
/// `xyz` must carry the floor columns `s`, `X`, `Z` and `theta`; they are
/// interpolated linearly in `s` (zero outside the sampled range) and
/// evaluated at every `s` of `profile`, which must carry `s` and `Profile`.
pub fn project_profile(xyz: &Table, mut profile: Table, width: f64) -> Result<Table> {
    let s_floor = xyz.numeric("s")?;
    let theta = Interp1d::new(s_floor, xyz.numeric("theta")?)?;
    let x0 = Interp1d::new(s_floor, xyz.numeric("X")?)?;
    let z0 = Interp1d::new(s_floor, xyz.numeric("Z")?)?;

    let (xs, zs): (Vec<f64>, Vec<f64>) = profile
        .numeric("s")?
        .iter()
        .zip(profile.numeric("Profile")?)
        .map(|(&s, &p)| project(x0.eval(s), z0.eval(s), theta.eval(s), p, width))
        .unzip();

    debug!(
        "[LATTICE] projected {} profile points onto {} floor points",
        xs.len(),
        s_floor.len()
    );

    profile.set_numeric("X", xs)?;
    profile.set_numeric("Z", zs)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const XYZ: &str = "\
_BEG_ 0.0 0.0 0.0 0.0 0.0
B1 1.0 0.0 0.0 1.0 0.0
B1 2.0 -0.2 0.0 2.0 0.4
D1 4.0 -1.0 0.0 3.8 0.4
";

    const MAG: &str = "\
_BEG_ 0.0 0.0
Q1 0.5 1.0
B1 1.5 0.5
D1 3.0 0.0
";

    fn tables() -> (Table, Table) {
        (
            Table::parse(XYZ, &["ElementName", "s", "X", "Y", "Z", "theta"]).unwrap(),
            Table::parse(MAG, &["ElementName", "s", "Profile"]).unwrap(),
        )
    }

    #[test]
    fn zero_profile_stays_on_reference_orbit() {
        for &(x0, z0, theta) in &[(0.0, 0.0, 0.0), (1.5, -3.25, 0.7), (-12.0, 40.0, -2.9)] {
            assert_eq!(project(x0, z0, theta, 0.0, DEFAULT_ELEMENT_WIDTH), (x0, z0));
        }
    }

    #[test]
    fn origin_reference_is_a_pure_rotation() {
        let (p, w) = (0.8, 0.5);
        for &theta in &[0.0, 0.3, std::f64::consts::FRAC_PI_2, 2.0] {
            let (x, z) = project(0.0, 0.0, theta, p, w);
            // Rotating (w * p, 0) by -theta.
            assert!((x - w * p * theta.cos()).abs() < 1e-12);
            assert!((z + w * p * theta.sin()).abs() < 1e-12);
            assert!((x.hypot(z) - w * p).abs() < 1e-12);
        }
    }

    #[test]
    fn adds_projected_columns() {
        let (xyz, mag) = tables();
        let view = project_profile(&xyz, mag, 0.5).unwrap();
        let x = view.numeric("X").unwrap();
        let z = view.numeric("Z").unwrap();
        assert_eq!(x.len(), 4);

        // s = 0.5 on a straight section: pushed 0.5 m along +X.
        assert!((x[1] - 0.5).abs() < 1e-12);
        assert!((z[1] - 0.5).abs() < 1e-12);

        // s = 3.0 has zero profile and lies on the interpolated orbit.
        assert!((x[3] + 0.6).abs() < 1e-12);
        assert!((z[3] - 2.9).abs() < 1e-12);

        // Original columns are kept in order.
        assert_eq!(
            view.column_names().collect::<Vec<_>>(),
            vec!["ElementName", "s", "Profile", "X", "Z"]
        );
    }

    #[test]
    fn missing_floor_column_is_an_error() {
        let xyz = Table::parse("0.0 0.0 0.0", &["s", "X", "Z"]).unwrap();
        let (_, mag) = tables();
        assert!(matches!(
            project_profile(&xyz, mag, 0.5),
            Err(Error::MissingColumn(name)) if name == "theta"
        ));
    }
}
