//! Property tests for the battle engine.

use dino_core::prelude::*;
use dino_core::{combat, movement, turning};
use dino_test_utils::fixtures::{robot, BattleBuilder};
use dino_test_utils::proptest::prelude::*;
use dino_test_utils::strategies;

proptest! {
    /// Any positive size yields an empty square board.
    #[test]
    fn prop_fresh_board_is_empty(size in 1i64..40) {
        let board = Board::new(size).unwrap();
        prop_assert_eq!(board.size() as i64, size);
        prop_assert_eq!(board.rows().count() as i64, size);
        prop_assert!(board.rows().all(|row| row.len() as i64 == size && row.iter().all(Option::is_none)));
    }

    /// Four identical turns bring a robot back to where it was facing.
    #[test]
    fn prop_four_turns_restore_direction(facing in strategies::direction(), turn in strategies::turn()) {
        let battle = BattleBuilder::new(5).robot(3, 3, facing).build();
        let mut current = battle.clone();
        for _ in 0..4 {
            current = turning::turn_robot(&current, robot(1), turn).unwrap();
        }
        prop_assert_eq!(current, battle);
    }

    /// Forward then backward (or the reverse) returns to the start.
    #[test]
    fn prop_step_round_trip(
        start in strategies::interior_position(9),
        facing in strategies::direction(),
        forward_first in any::<bool>(),
    ) {
        let battle = BattleBuilder::new(9).robot(start.row, start.col, facing).build();
        let (first, second) = if forward_first {
            (movement::Step::Forward, movement::Step::Backward)
        } else {
            (movement::Step::Backward, movement::Step::Forward)
        };

        let moved = movement::move_robot(&battle, robot(1), first).unwrap();
        prop_assert_ne!(moved.entities[&robot(1)].position, start);
        let back = movement::move_robot(&moved, robot(1), second).unwrap();

        prop_assert_eq!(back, battle);
    }

    /// Placing off the board fails with a range error and changes nothing.
    #[test]
    fn prop_out_of_range_placement(position in strategies::position_off(6)) {
        let battle = BattleBuilder::new(6).robot(1, 1, Direction::North).build();
        let snapshot = battle.clone();

        let result = battle.place_entity(Entity::dinosaur(
            EntityId::new(EntityKind::Dinosaur, 1),
            position,
        ));

        let out_of_range = matches!(result, Err(BattleError::OutOfRange { .. }));
        prop_assert!(out_of_range);
        prop_assert_eq!(battle, snapshot);
    }

    /// Attacks remove exactly the adjacent dinosaurs and never a robot.
    #[test]
    fn prop_attack_removes_only_adjacent_dinosaurs(
        origin in strategies::position_on(7),
        others in prop::collection::vec((strategies::position_on(7), any::<bool>()), 0..20),
    ) {
        let mut builder = BattleBuilder::new(7).robot(origin.row, origin.col, Direction::North);
        let mut taken = vec![origin];
        for (position, is_robot) in others {
            if taken.contains(&position) {
                continue;
            }
            taken.push(position);
            builder = if is_robot {
                builder.robot(position.row, position.col, Direction::South)
            } else {
                builder.dinosaur(position.row, position.col)
            };
        }
        let battle = builder.build();

        let outcome = combat::attack(&battle, robot(1)).unwrap();

        let adjacent = |p: Position| {
            p != origin && (p.row - origin.row).abs() <= 1 && (p.col - origin.col).abs() <= 1
        };
        for entity in battle.entities.values() {
            let survives = outcome.battle.entities.contains_key(&entity.id);
            if entity.is_dinosaur() && adjacent(entity.position) {
                prop_assert!(!survives);
            } else {
                prop_assert!(survives);
            }
        }
        prop_assert_eq!(
            outcome.battle.entities.len(),
            battle.entities.len() - outcome.destroyed.len()
        );
        prop_assert!(outcome.battle.check_invariants().is_ok());
    }

    /// Whatever a robot does, board and registry stay consistent.
    #[test]
    fn prop_commands_keep_invariants(
        actions in prop::collection::vec(strategies::action(), 1..40),
    ) {
        let mut battle = BattleBuilder::new(6)
            .robot(3, 3, Direction::North)
            .dinosaur(1, 1)
            .dinosaur(6, 6)
            .robot(5, 2, Direction::West)
            .build();
        for action in actions {
            match battle.apply(robot(1), action) {
                Ok((next, _)) => battle = next,
                Err(BattleError::Blocked { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            prop_assert!(battle.check_invariants().is_ok());
        }
    }
}
