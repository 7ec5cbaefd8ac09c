//! Glycolysis parameter keys
//!
//! Literature values for *S. cerevisiae* glycolysis (Smallbone et al. 2013, van Eunen
//! et al. 2012). Velocities are in mM/min, Michaelis and inhibition constants in mM.

crate::parameter_enum! {
    /// Rate-law constants of the eleven glycolytic reactions.
    pub enum GlycolysisParam {
        /// Hexokinase maximal velocity
        HxkVmax => "HXK_Vmax" = 226.5,
        HxkKmGlucose => "HXK_Km_glucose" = 0.1,
        /// Product inhibition by G6P
        HxkKiG6p => "HXK_Ki_G6P" = 0.04,
        /// Trehalose-6-phosphate inhibition
        HxkKiT6p => "HXK_Ki_T6P" = 0.04,

        PgiVmax => "PGI_Vmax" = 339.7,
        PgiKmG6p => "PGI_Km_G6P" = 1.4,
        PgiKmF6p => "PGI_Km_F6P" = 0.3,
        PgiKeq => "PGI_Keq" = 0.29,

        PfkVmax => "PFK_Vmax" = 182.9,
        PfkKmF6p => "PFK_Km_F6P" = 0.1,
        PfkKmAtp => "PFK_Km_ATP" = 0.71,
        /// ATP substrate inhibition
        PfkKiAtp => "PFK_Ki_ATP" = 0.65,
        /// AMP activation
        PfkKaAmp => "PFK_Ka_AMP" = 0.0995,

        AldVmax => "ALD_Vmax" = 322.3,
        AldKmF16bp => "ALD_Km_F16BP" = 0.3,
        AldKmDhap => "ALD_Km_DHAP" = 2.4,
        AldKmGap => "ALD_Km_GAP" = 2.0,
        AldKeq => "ALD_Keq" = 0.069,

        TpiVmax => "TPI_Vmax" = 999.3,
        TpiKmDhap => "TPI_Km_DHAP" = 1.2,
        TpiKmGap => "TPI_Km_GAP" = 1.2,
        TpiKeq => "TPI_Keq" = 0.045,

        GapdhVmax => "GAPDH_Vmax" = 1184.5,
        GapdhKmGap => "GAPDH_Km_GAP" = 0.39,
        GapdhKmNad => "GAPDH_Km_NAD" = 2.84,
        GapdhKmPi => "GAPDH_Km_Pi" = 3.9,

        PgkVmax => "PGK_Vmax" = 1306.4,
        PgkKm13bpg => "PGK_Km_13BPG" = 0.003,
        PgkKmAdp => "PGK_Km_ADP" = 0.2,

        GpmVmax => "GPM_Vmax" = 2525.8,
        GpmKm3pg => "GPM_Km_3PG" = 1.2,
        GpmKm2pg => "GPM_Km_2PG" = 0.08,
        GpmKeq => "GPM_Keq" = 0.19,

        EnoVmax => "ENO_Vmax" = 365.8,
        EnoKm2pg => "ENO_Km_2PG" = 0.04,
        EnoKmPep => "ENO_Km_PEP" = 0.5,
        EnoKeq => "ENO_Keq" = 6.7,

        PykVmax => "PYK_Vmax" = 1088.0,
        PykKmPep => "PYK_Km_PEP" = 0.14,
        PykKmAdp => "PYK_Km_ADP" = 0.53,
        /// Feed-forward activation by F16BP
        PykKaF16bp => "PYK_Ka_F16BP" = 0.19,
        /// Hill coefficient of the F16BP activation
        PykN => "PYK_n" = 4.0,

        PdcVmax => "PDC_Vmax" = 174.4,
        PdcKmPyruvate => "PDC_Km_pyruvate" = 6.36,
        /// Hill coefficient of pyruvate binding
        PdcN => "PDC_n" = 1.9,
    }
}

#[cfg(test)]
mod tests {
    use crate::parameters::ParameterKey;

    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in GlycolysisParam::ALL {
            let parsed: GlycolysisParam = key.name().parse().unwrap();
            assert_eq!(parsed, *key);
        }
    }

    #[test]
    fn test_index_matches_position() {
        for (i, key) in GlycolysisParam::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
        assert_eq!(GlycolysisParam::count(), 45);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!("HXK_vmax".parse::<GlycolysisParam>().is_err());
        assert!("PFK_n".parse::<GlycolysisParam>().is_err());
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let json = serde_json::to_string(&GlycolysisParam::PgkKm13bpg).unwrap();
        assert_eq!(json, "\"PGK_Km_13BPG\"");
    }
}
