//! TCA cycle parameter keys
//!
//! Literature values for the mitochondrial TCA cycle (Wu et al. 2007, Berndt et al. 2012).

crate::parameter_enum! {
    /// Rate-law constants of pyruvate import and the nine TCA cycle reactions.
    pub enum TcaParam {
        PyrTransportVmax => "PYR_transport_Vmax" = 50.0,
        PyrTransportKm => "PYR_transport_Km" = 0.019,

        PdhVmax => "PDH_Vmax" = 100.0,
        PdhKmPyruvate => "PDH_Km_pyruvate" = 0.025,
        PdhKmNad => "PDH_Km_NAD" = 0.05,
        PdhKmCoa => "PDH_Km_CoA" = 0.013,

        CsVmax => "CS_Vmax" = 100.0,
        CsKmAccoa => "CS_Km_AcCoA" = 0.013,
        CsKmOaa => "CS_Km_OAA" = 0.002,
        /// Allosteric inhibition by ATP
        CsKiAtp => "CS_Ki_ATP" = 0.9,
        /// Product inhibition by citrate
        CsKiCitrate => "CS_Ki_citrate" = 1.5,

        AcoVmax => "ACO_Vmax" = 150.0,
        AcoKmCitrate => "ACO_Km_citrate" = 0.48,
        AcoKmIsocitrate => "ACO_Km_isocitrate" = 0.12,
        AcoKeq => "ACO_Keq" = 0.067,

        IcdhVmax => "ICDH_Vmax" = 85.0,
        IcdhKmIsocitrate => "ICDH_Km_isocitrate" = 0.11,
        IcdhKmNad => "ICDH_Km_NAD" = 0.09,
        /// ADP activation
        IcdhKaAdp => "ICDH_Ka_ADP" = 0.1,
        /// Calcium activation
        IcdhKaCa => "ICDH_Ka_Ca" = 0.001,

        KgdhVmax => "KGDH_Vmax" = 75.0,
        KgdhKmAkg => "KGDH_Km_aKG" = 0.4,
        KgdhKmNad => "KGDH_Km_NAD" = 0.038,
        KgdhKmCoa => "KGDH_Km_CoA" = 0.013,
        KgdhKiSuccoa => "KGDH_Ki_SucCoA" = 0.05,
        KgdhKiNadh => "KGDH_Ki_NADH" = 0.05,
        KgdhKaCa => "KGDH_Ka_Ca" = 0.001,

        ScsVmax => "SCS_Vmax" = 75.0,
        ScsKmSuccoa => "SCS_Km_SucCoA" = 0.056,
        ScsKmGdp => "SCS_Km_GDP" = 0.01,
        ScsKmPi => "SCS_Km_Pi" = 0.56,

        SdhVmax => "SDH_Vmax" = 60.0,
        SdhKmSuccinate => "SDH_Km_succinate" = 0.45,
        SdhKmFad => "SDH_Km_FAD" = 0.002,

        FhVmax => "FH_Vmax" = 200.0,
        FhKmFumarate => "FH_Km_fumarate" = 0.044,
        FhKmMalate => "FH_Km_malate" = 0.25,
        FhKeq => "FH_Keq" = 4.4,

        MdhVmax => "MDH_Vmax" = 180.0,
        MdhKmMalate => "MDH_Km_malate" = 0.025,
        MdhKmNad => "MDH_Km_NAD" = 0.22,
        MdhKmOaa => "MDH_Km_OAA" = 0.003,
        MdhKmNadh => "MDH_Km_NADH" = 0.025,
        /// Equilibrium strongly favors malate
        MdhKeq => "MDH_Keq" = 6.9e-5,
    }
}

#[cfg(test)]
mod tests {
    use crate::parameters::ParameterKey;

    use super::*;

    #[test]
    fn test_key_count() {
        assert_eq!(TcaParam::count(), 44);
    }

    #[test]
    fn test_literature_values() {
        assert_eq!(TcaParam::MdhKeq.literature_value(), 6.9e-5);
        assert_eq!(TcaParam::KgdhKiSuccoa.literature_value(), 0.05);
        assert_eq!("ICDH_Ka_Ca".parse::<TcaParam>().unwrap(), TcaParam::IcdhKaCa);
    }
}
