//! Physical constants as quantities

use std::f64::consts::PI;
use quanta_core::Dimension;
use crate::Quantity;

// ============================================================================
// Gravitation and electromagnetism
// ============================================================================

/// Newtonian constant of gravitation, m^3 kg^-1 s^-2
pub fn gravitational_constant() -> Quantity {
    Quantity::new(6.673e-11, Dimension::new([3, -1, -2, 0, 0, 0, 0]))
}

/// Speed of light in vacuum, m/s
pub fn speed_of_light() -> Quantity {
    Quantity::new(299_792_458.0, Dimension::VELOCITY)
}

/// Permittivity of free space, C^2 N^-1 m^-2
pub fn vacuum_permittivity() -> Quantity {
    Quantity::new(8.8541878176e-12, Dimension::new([-3, -1, 4, 2, 0, 0, 0]))
}

/// Permeability of free space, N A^-2
pub fn vacuum_permeability() -> Quantity {
    Quantity::new(4.0 * PI * 1e-7, Dimension::new([1, 1, -2, -2, 0, 0, 0]))
}

/// Constants by conventional symbol
pub const CONSTANTS: &[(&str, fn() -> Quantity)] = &[
    ("G", gravitational_constant),
    ("c", speed_of_light),
    ("epsilon_0", vacuum_permittivity),
    ("mu_0", vacuum_permeability),
];

pub fn constant(symbol: &str) -> Option<Quantity> {
    CONSTANTS.iter().find(|(s, _)| *s == symbol).map(|(_, f)| f())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::UNITS;

    #[test]
    fn test_permittivity_matches_units() {
        let coulomb = UNITS.get("coulomb").unwrap().as_quantity();
        let newton = UNITS.get("newton").unwrap().as_quantity();
        let metre = UNITS.get("metre").unwrap().as_quantity();
        let expected = coulomb
            .mul(&coulomb)
            .and_then(|q| q.div(&newton))
            .and_then(|q| q.div(&metre.mul(&metre)?))
            .unwrap();
        assert_eq!(vacuum_permittivity().dimension, expected.dimension);
    }

    #[test]
    fn test_light_speed_relation() {
        // c^2 = 1 / (mu_0 epsilon_0)
        let product = vacuum_permeability()
            .mul(&vacuum_permittivity())
            .and_then(|q| q.recip())
            .unwrap();
        let c = speed_of_light();
        let c2 = c.mul(&c).unwrap();
        assert_eq!(product.dimension, c2.dimension);
        assert_relative_eq!(product.value, c2.value, max_relative = 1e-9);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(constant("c"), Some(speed_of_light()));
        assert!(constant("h").is_none());
        assert_eq!(gravitational_constant().to_string(), "6.673e-11 m^3 kg^-1 s^-2");
    }
}
