use serde::{Deserialize, Serialize};

use crate::parameters::{GlycolysisParam as G, ParameterSet};

use super::laws::{
    activation_factor, competitive_km, hill, hill_activation_factor, inhibition_factor,
    michaelis_menten, reversible_michaelis_menten, saturation,
};

/// Cofactor and effector levels held constant during a glycolysis simulation (mM).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlycolysisCofactors {
    pub atp: f64,
    pub adp: f64,
    pub amp: f64,
    pub nad: f64,
    pub pi: f64,
    /// Trehalose-6-phosphate
    pub t6p: f64,
    /// Fructose-2,6-bisphosphate
    pub f26bp: f64,
}

impl Default for GlycolysisCofactors {
    fn default() -> Self {
        Self {
            atp: 2.5,
            adp: 1.3,
            amp: 0.28,
            nad: 1.2,
            pi: 50.0,
            t6p: 0.024,
            f26bp: 0.014,
        }
    }
}

type Params = ParameterSet<G>;

/// Hexokinase: glucose + ATP → G6P + ADP.
///
/// Competitive inhibition by T6P raises the apparent Km, G6P inhibits the product side.
pub fn hexokinase(p: &Params, glucose: f64, g6p: f64, c: &GlycolysisCofactors) -> f64 {
    let km_app = competitive_km(p[G::HxkKmGlucose], c.t6p, p[G::HxkKiT6p]);
    michaelis_menten(p[G::HxkVmax], glucose, km_app) * inhibition_factor(g6p, p[G::HxkKiG6p])
}

/// Phosphoglucose isomerase: G6P ⇌ F6P.
pub fn phosphoglucose_isomerase(p: &Params, g6p: f64, f6p: f64) -> f64 {
    reversible_michaelis_menten(
        p[G::PgiVmax],
        g6p,
        f6p,
        p[G::PgiKmG6p],
        p[G::PgiKmF6p],
        p[G::PgiKeq],
    )
}

/// Phosphofructokinase: F6P + ATP → F16BP + ADP.
///
/// ATP acts both as substrate and as inhibitor, AMP activates linearly.
pub fn phosphofructokinase(p: &Params, f6p: f64, c: &GlycolysisCofactors) -> f64 {
    let atp_term = c.atp / (p[G::PfkKmAtp] * (1.0 + c.atp / p[G::PfkKiAtp]));
    p[G::PfkVmax]
        * activation_factor(c.amp, p[G::PfkKaAmp])
        * saturation(f6p, p[G::PfkKmF6p])
        * (atp_term / (1.0 + atp_term))
}

/// Aldolase: F16BP ⇌ DHAP + GAP.
pub fn aldolase(p: &Params, f16bp: f64, dhap: f64, gap: f64) -> f64 {
    let vmax = p[G::AldVmax];
    let forward = michaelis_menten(vmax, f16bp, p[G::AldKmF16bp]);
    let reverse = (vmax / p[G::AldKeq]) * (dhap * gap)
        / ((p[G::AldKmDhap] + dhap) * (p[G::AldKmGap] + gap));
    forward - reverse
}

/// Triose phosphate isomerase: DHAP ⇌ GAP.
pub fn triose_phosphate_isomerase(p: &Params, dhap: f64, gap: f64) -> f64 {
    reversible_michaelis_menten(
        p[G::TpiVmax],
        dhap,
        gap,
        p[G::TpiKmDhap],
        p[G::TpiKmGap],
        p[G::TpiKeq],
    )
}

/// Glyceraldehyde-3-phosphate dehydrogenase: GAP + NAD⁺ + Pi → 1,3-BPG + NADH.
pub fn gapdh(p: &Params, gap: f64, c: &GlycolysisCofactors) -> f64 {
    p[G::GapdhVmax]
        * saturation(gap, p[G::GapdhKmGap])
        * saturation(c.nad, p[G::GapdhKmNad])
        * saturation(c.pi, p[G::GapdhKmPi])
}

/// Phosphoglycerate kinase: 1,3-BPG + ADP → 3PG + ATP.
pub fn phosphoglycerate_kinase(p: &Params, bpg: f64, c: &GlycolysisCofactors) -> f64 {
    p[G::PgkVmax] * saturation(bpg, p[G::PgkKm13bpg]) * saturation(c.adp, p[G::PgkKmAdp])
}

/// Phosphoglycerate mutase: 3PG ⇌ 2PG.
pub fn phosphoglycerate_mutase(p: &Params, pg3: f64, pg2: f64) -> f64 {
    reversible_michaelis_menten(
        p[G::GpmVmax],
        pg3,
        pg2,
        p[G::GpmKm3pg],
        p[G::GpmKm2pg],
        p[G::GpmKeq],
    )
}

/// Enolase: 2PG ⇌ PEP + H₂O.
pub fn enolase(p: &Params, pg2: f64, pep: f64) -> f64 {
    reversible_michaelis_menten(
        p[G::EnoVmax],
        pg2,
        pep,
        p[G::EnoKm2pg],
        p[G::EnoKmPep],
        p[G::EnoKeq],
    )
}

/// Pyruvate kinase: PEP + ADP → pyruvate + ATP, with F16BP feed-forward activation.
pub fn pyruvate_kinase(p: &Params, pep: f64, f16bp: f64, c: &GlycolysisCofactors) -> f64 {
    p[G::PykVmax]
        * hill_activation_factor(f16bp, p[G::PykKaF16bp], p[G::PykN])
        * saturation(pep, p[G::PykKmPep])
        * saturation(c.adp, p[G::PykKmAdp])
}

/// Pyruvate decarboxylase: pyruvate → acetaldehyde + CO₂, cooperative in pyruvate.
pub fn pyruvate_decarboxylase(p: &Params, pyruvate: f64) -> f64 {
    hill(p[G::PdcVmax], pyruvate, p[G::PdcKmPyruvate], p[G::PdcN])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_pgi_zero_net_flux_at_equilibrium_ratio() {
        // ARRANGE
        // With Km_G6P = 0.3, Km_F6P = 1.0 and Keq = 0.5 the forward and reverse terms
        // balance at G6P = 1.4, F6P = Keq · G6P = 0.7
        let keq = 0.5;
        let params = Params::literature()
            .with(G::PgiKmG6p, 0.3)
            .with(G::PgiKmF6p, 1.0)
            .with(G::PgiKeq, keq);
        let g6p = 1.4;
        let f6p = keq * g6p;

        // ACT
        let v = phosphoglucose_isomerase(&params, g6p, f6p);

        // ASSERT
        assert_relative_eq!(v, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pgi_direction_follows_ratio() {
        let params = Params::literature();
        assert!(phosphoglucose_isomerase(&params, 5.0, 0.01) > 0.0);
        assert!(phosphoglucose_isomerase(&params, 0.01, 5.0) < 0.0);
    }

    #[test]
    fn test_hexokinase_literature_value() {
        let params = Params::literature();
        let c = GlycolysisCofactors::default();
        let v = hexokinase(&params, 0.087, 2.45, &c);

        let km_app = 0.1 * (1.0 + 0.024 / 0.04);
        let expected = 226.5 * 0.087 / (km_app + 0.087) / (1.0 + 2.45 / 0.04);
        assert_relative_eq!(v, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_pyruvate_kinase_activation_bounds() {
        let params = Params::literature();
        let c = GlycolysisCofactors::default();
        let base = pyruvate_kinase(&params, 0.07, 0.0, &c);
        let saturated = pyruvate_kinase(&params, 0.07, 1e3, &c);
        assert_relative_eq!(saturated / base, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pyruvate_decarboxylase_half_rate_at_km() {
        let params = Params::literature();
        assert_relative_eq!(pyruvate_decarboxylase(&params, 6.36), 174.4 / 2.0, epsilon = 1e-10);
    }
}
