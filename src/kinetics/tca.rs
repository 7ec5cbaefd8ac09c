use serde::{Deserialize, Serialize};

use crate::parameters::{ParameterSet, TcaParam as T};

use super::laws::{activation_factor, inhibition_factor, michaelis_menten, reversible_michaelis_menten, saturation};

/// Mitochondrial cofactor pools held constant during a TCA simulation (mM).
///
/// `adp` and `atp` default to zero, which leaves the ADP activation of isocitrate
/// dehydrogenase and the ATP inhibition of citrate synthase switched off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TcaCofactors {
    pub coa: f64,
    pub nad: f64,
    pub nadh: f64,
    pub fad: f64,
    pub fadh2: f64,
    pub gdp: f64,
    pub gtp: f64,
    pub pi: f64,
    pub ca: f64,
    pub adp: f64,
    pub atp: f64,
    /// Cytosolic pyruvate available for import
    pub pyruvate_supply: f64,
}

impl Default for TcaCofactors {
    fn default() -> Self {
        Self {
            coa: 0.5,
            nad: 2.0,
            nadh: 0.1,
            fad: 0.5,
            fadh2: 0.05,
            gdp: 1.0,
            gtp: 0.5,
            pi: 5.0,
            ca: 0.001,
            adp: 0.0,
            atp: 0.0,
            pyruvate_supply: 0.5,
        }
    }
}

type Params = ParameterSet<T>;

/// Pyruvate import from a constant cytosolic supply.
pub fn pyruvate_transport(p: &Params, c: &TcaCofactors) -> f64 {
    michaelis_menten(p[T::PyrTransportVmax], c.pyruvate_supply, p[T::PyrTransportKm])
}

/// Pyruvate dehydrogenase: pyruvate + NAD⁺ + CoA → acetyl-CoA + NADH + CO₂.
pub fn pyruvate_dehydrogenase(p: &Params, pyruvate: f64, c: &TcaCofactors) -> f64 {
    p[T::PdhVmax]
        * saturation(pyruvate, p[T::PdhKmPyruvate])
        * saturation(c.nad, p[T::PdhKmNad])
        * saturation(c.coa, p[T::PdhKmCoa])
}

/// Citrate synthase: acetyl-CoA + OAA → citrate + CoA.
///
/// Inhibited by its product citrate and allosterically by ATP.
pub fn citrate_synthase(p: &Params, accoa: f64, oaa: f64, citrate: f64, c: &TcaCofactors) -> f64 {
    p[T::CsVmax]
        * saturation(accoa, p[T::CsKmAccoa])
        * saturation(oaa, p[T::CsKmOaa])
        * inhibition_factor(citrate, p[T::CsKiCitrate])
        * inhibition_factor(c.atp, p[T::CsKiAtp])
}

/// Aconitase: citrate ⇌ isocitrate.
pub fn aconitase(p: &Params, citrate: f64, isocitrate: f64) -> f64 {
    reversible_michaelis_menten(
        p[T::AcoVmax],
        citrate,
        isocitrate,
        p[T::AcoKmCitrate],
        p[T::AcoKmIsocitrate],
        p[T::AcoKeq],
    )
}

/// Isocitrate dehydrogenase: isocitrate + NAD⁺ → α-KG + NADH + CO₂.
///
/// Activated by Ca²⁺ and ADP.
pub fn isocitrate_dehydrogenase(p: &Params, isocitrate: f64, c: &TcaCofactors) -> f64 {
    p[T::IcdhVmax]
        * activation_factor(c.ca, p[T::IcdhKaCa])
        * activation_factor(c.adp, p[T::IcdhKaAdp])
        * saturation(isocitrate, p[T::IcdhKmIsocitrate])
        * saturation(c.nad, p[T::IcdhKmNad])
}

/// α-Ketoglutarate dehydrogenase: α-KG + NAD⁺ + CoA → succinyl-CoA + NADH + CO₂.
///
/// Activated by Ca²⁺, inhibited by succinyl-CoA and NADH.
pub fn alpha_ketoglutarate_dehydrogenase(p: &Params, akg: f64, succoa: f64, c: &TcaCofactors) -> f64 {
    p[T::KgdhVmax]
        * activation_factor(c.ca, p[T::KgdhKaCa])
        * inhibition_factor(succoa, p[T::KgdhKiSuccoa])
        * inhibition_factor(c.nadh, p[T::KgdhKiNadh])
        * saturation(akg, p[T::KgdhKmAkg])
        * saturation(c.nad, p[T::KgdhKmNad])
        * saturation(c.coa, p[T::KgdhKmCoa])
}

/// Succinyl-CoA synthetase: succinyl-CoA + GDP + Pi → succinate + GTP + CoA.
pub fn succinyl_coa_synthetase(p: &Params, succoa: f64, c: &TcaCofactors) -> f64 {
    p[T::ScsVmax]
        * saturation(succoa, p[T::ScsKmSuccoa])
        * saturation(c.gdp, p[T::ScsKmGdp])
        * saturation(c.pi, p[T::ScsKmPi])
}

/// Succinate dehydrogenase: succinate + FAD → fumarate + FADH₂.
pub fn succinate_dehydrogenase(p: &Params, succinate: f64, c: &TcaCofactors) -> f64 {
    p[T::SdhVmax] * saturation(succinate, p[T::SdhKmSuccinate]) * saturation(c.fad, p[T::SdhKmFad])
}

/// Fumarase: fumarate ⇌ malate.
pub fn fumarase(p: &Params, fumarate: f64, malate: f64) -> f64 {
    reversible_michaelis_menten(
        p[T::FhVmax],
        fumarate,
        malate,
        p[T::FhKmFumarate],
        p[T::FhKmMalate],
        p[T::FhKeq],
    )
}

/// Malate dehydrogenase: malate + NAD⁺ ⇌ OAA + NADH.
pub fn malate_dehydrogenase(p: &Params, malate: f64, oaa: f64, c: &TcaCofactors) -> f64 {
    let vmax = p[T::MdhVmax];
    let forward = vmax * saturation(malate, p[T::MdhKmMalate]) * saturation(c.nad, p[T::MdhKmNad]);
    let reverse = (vmax / p[T::MdhKeq])
        * saturation(oaa, p[T::MdhKmOaa])
        * saturation(c.nadh, p[T::MdhKmNadh]);
    forward - reverse
}
