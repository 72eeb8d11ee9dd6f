use std::fs;

use exprboost::prelude::*;


/// Tests for `Logger`.
#[cfg(test)]
pub mod logger_tests {
    use super::*;

    fn train() -> DataTable {
        DataTable::from_columns(vec![
            ("x", Type::Double, Column::Double(vec![0.0, 1.0, 2.0, 3.0, 4.0])),
            ("y", Type::Double, Column::Double(vec![1.0, 0.0, 1.0, 0.0, 1.0])),
        ])
            .unwrap()
            .with_target(vec![-1.0, 1.0, -1.0, 1.0, 1.0])
            .unwrap()
    }

    #[test]
    fn writes_one_line_per_round() {
        let train = train();
        let mut arena = ExpressionArena::new();
        let inputs = arena.variables(&train);

        let booster = AdaBoost::init(&train, arena)
            .max_iterations(5);
        let wl = StumpLearner::new(inputs);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaboost.csv");

        let mut logger = LoggerBuilder::new()
            .booster(booster)
            .weak_learner(wl)
            .time_limit_as_secs(60)
            .print_every(2)
            .build()
            .unwrap();
        let f = logger.run(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "Iteration,Edge,Loss,LogLoss,TrainError,ValidationError,Time"
        );

        // One line per contribution.
        assert_eq!(lines.len(), f.n_members() + 1);
        for (k, line) in lines[1..].iter().enumerate() {
            let cells = line.split(',').collect::<Vec<_>>();
            assert_eq!(cells.len(), 7);
            assert_eq!(cells[0], (k + 1).to_string());
            let edge = cells[1].parse::<f64>().unwrap();
            assert!((0.0..=1.0).contains(&edge));
            // No validation table.
            assert_eq!(cells[5], "");
        }
    }

    #[test]
    fn silent_logger() {
        let train = train();
        let mut arena = ExpressionArena::new();
        let inputs = arena.variables(&train);
        let booster = AdaBoost::init(&train, arena)
            .max_iterations(3);

        let file = tempfile::NamedTempFile::new().unwrap();
        let mut logger = Logger::new(booster, StumpLearner::new(inputs))
            .print_every(usize::MAX);
        let f = logger.run(file.path()).unwrap();
        assert!(f.n_members() <= 3);
    }
}
