#[cfg(test)]
mod test_simulation {
    use approx::assert_relative_eq;
    use metabolic_mcem::{
        kinetics::tca as k,
        prelude::{
            ConcentrationFloor, ExplicitSolver, GlycolysisModel, Integrator, ParameterSet,
            Pathway, SolverSetupBuilder, StiffSolver, TcaCofactors, TcaModel, TcaParam, RK4,
        },
    };
    use peroxide::fuga::ODEProblem;

    /// The oxaloacetate balance closes the cycle: d[OAA]/dt = v_MDH − v_CS for any state.
    ///
    /// Both fluxes are recomputed directly from the rate laws, independently of the
    /// simulator's derivative.
    #[test]
    fn test_oxaloacetate_closes_cycle() {
        let model = TcaModel::from_parameters(ParameterSet::literature());
        let p = model.parameters();
        let c = TcaCofactors::default();

        let states = [
            model.initial_state(),
            vec![0.2, 0.05, 1.5, 0.1, 0.3, 0.01, 0.9, 0.4, 1.2, 0.002],
            vec![1.0, 0.0, 0.5, -0.1, 0.1, 0.05, 0.5, 0.2, 0.5, -0.3],
        ];

        for y in states {
            let x: [f64; 10] = ConcentrationFloor::TCA.clamp_into(&y);
            let cs = k::citrate_synthase(p, x[1], x[9], x[2], &c);
            let mdh = k::malate_dehydrogenase(p, x[8], x[9], &c);

            let mut dy = vec![0.0; 10];
            model.derivative(0.0, &y, &mut dy);

            assert_eq!(dy[9], mdh - cs);
        }
    }

    /// Zero and negative TCA concentrations are floored before they reach the rate laws.
    #[test]
    fn test_tca_clamping_does_not_raise() {
        // ARRANGE
        let model = TcaModel::from_parameters(ParameterSet::literature());
        let negative = vec![-1.0; 10];
        let floored = vec![1e-10; 10];

        // ACT
        let mut dy_negative = vec![0.0; 10];
        let mut dy_floored = vec![0.0; 10];
        model.rhs(0.0, &negative, &mut dy_negative).unwrap();
        model.rhs(0.0, &floored, &mut dy_floored).unwrap();

        // ASSERT
        assert!(dy_negative.iter().all(|v| v.is_finite()));
        assert_eq!(dy_negative, dy_floored);
    }

    /// Both pathways integrate to finite trajectories with the stiff solver.
    #[test]
    fn test_stiff_integration_of_both_pathways() {
        let times = [0.0, 0.5, 1.0, 2.0, 5.0];
        let solver = StiffSolver::default();

        let glycolysis = GlycolysisModel::from_parameters(ParameterSet::literature());
        let traj = solver
            .integrate(&glycolysis, &glycolysis.initial_state(), &times)
            .unwrap();
        assert_eq!(traj.n_times(), times.len());
        assert_eq!(traj.n_states(), GlycolysisModel::dimension());
        assert!(traj.states().iter().all(|v| v.is_finite()));

        let tca = TcaModel::from_parameters(ParameterSet::literature());
        let traj = solver.integrate(&tca, &tca.initial_state(), &times).unwrap();
        assert_eq!(traj.times(), &times);
        assert!(traj.states().iter().all(|v| v.is_finite()));
    }

    /// Stiff and fine-step explicit integration agree on the TCA cycle.
    #[test]
    fn test_stiff_matches_explicit_on_tca() {
        // ARRANGE
        let model = TcaModel::from_parameters(ParameterSet::literature());
        let times = [0.0, 0.05, 0.1];
        let stiff = StiffSolver::new(
            SolverSetupBuilder::default()
                .rtol(1e-8)
                .atol(1e-10)
                .build()
                .unwrap(),
        );
        let explicit = ExplicitSolver::new(RK4, 1e-5);

        // ACT
        let a = stiff.integrate(&model, &model.initial_state(), &times).unwrap();
        let b = explicit
            .integrate(&model, &model.initial_state(), &times)
            .unwrap();

        // ASSERT
        for (x, y) in a.states().iter().zip(b.states().iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-4, max_relative = 1e-3);
        }
    }

    /// Reparameterizing keeps cofactors and changes the dynamics.
    #[test]
    fn test_reparameterize_changes_only_parameters() {
        let cofactors = TcaCofactors {
            pyruvate_supply: 2.0,
            ..TcaCofactors::default()
        };
        let model = TcaModel::from_parameters(ParameterSet::literature()).with_cofactors(cofactors);
        let faster = model.reparameterize(
            ParameterSet::literature().with(TcaParam::PyrTransportVmax, 100.0),
        );

        assert_eq!(faster.cofactors(), &cofactors);

        let y = model.initial_state();
        let mut dy = vec![0.0; 10];
        let mut dy_faster = vec![0.0; 10];
        model.derivative(0.0, &y, &mut dy);
        faster.derivative(0.0, &y, &mut dy_faster);

        assert!(dy_faster[0] > dy[0]);
        assert_eq!(dy_faster[1..], dy[1..]);
    }
}
