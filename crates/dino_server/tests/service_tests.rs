//! Request handling through the service and the JSON-lines driver.

use dino_core::battle::BattleId;
use dino_core::store::InMemoryStore;
use dino_core::turning::Direction;
use dino_server::driver::run_lines;
use dino_core::entity::Position;
use dino_server::protocol::PositionInput;
use dino_server::{BattleService, Request, Response, ServerConfig};

fn service() -> BattleService<InMemoryStore> {
    let config = ServerConfig {
        rng_seed: Some(7),
        ..ServerConfig::default()
    };
    BattleService::new(InMemoryStore::new(), config)
}

async fn create(service: &BattleService<InMemoryStore>, size: Option<i64>) -> i64 {
    match service.handle(Request::CreateBattle { size }).await {
        Response::BattleCreated { id, .. } => i64::from(id),
        other => panic!("unexpected response: {other:?}"),
    }
}

async fn place_robot(
    service: &BattleService<InMemoryStore>,
    battle_id: i64,
    row: i64,
    col: i64,
    direction: &str,
) -> String {
    let response = service
        .handle(Request::PlaceRobot {
            battle_id,
            at: Position::new(row, col).into(),
            direction: direction.to_string(),
        })
        .await;
    match response {
        Response::EntityPlaced { entity_id } => entity_id,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn error_code(response: &Response) -> &str {
    match response {
        Response::Error { code, .. } => code,
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_battle_uses_default_size() {
    let service = service();
    let response = service.handle(Request::CreateBattle { size: None }).await;
    match response {
        Response::BattleCreated { id, board_size } => {
            assert!((1000..=9999).contains(&id));
            assert_eq!(board_size, 50);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_battle_rejects_bad_size() {
    let service = service();
    for size in [0, -4, 1001, 100_000, 3_000_000_000, i64::MAX] {
        let response = service
            .handle(Request::CreateBattle { size: Some(size) })
            .await;
        assert_eq!(error_code(&response), "invalid_size", "size {size}");
    }
    assert!(service.repository().store().is_empty());
}

#[tokio::test]
async fn test_full_battle_flow() {
    let service = service();
    let battle_id = create(&service, Some(9)).await;

    let robot = place_robot(&service, battle_id, 3, 3, "north").await;
    assert!(robot.starts_with("R-"));

    let response = service
        .handle(Request::PlaceDinosaur {
            battle_id,
            at: PositionInput::Pair {
                position: "2,4".to_string(),
            },
        })
        .await;
    let Response::EntityPlaced { entity_id: dino } = response else {
        panic!("unexpected response: {response:?}");
    };
    assert!(dino.starts_with("D-"));

    let response = service
        .handle(Request::Command {
            battle_id,
            robot: robot.clone(),
            action: "attack".to_string(),
        })
        .await;
    match response {
        Response::Ack {
            action, destroyed, ..
        } => {
            assert_eq!(action, "attack");
            assert_eq!(destroyed, vec![dino]);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let response = service
        .handle(Request::Command {
            battle_id,
            robot: robot.clone(),
            action: "move-forward".to_string(),
        })
        .await;
    match response {
        Response::Ack { robot: view, .. } => {
            assert_eq!(view.position.row, 2);
            assert_eq!(view.position.col, 3);
            assert_eq!(view.direction, Some(Direction::North));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let response = service.handle(Request::State { battle_id }).await;
    match response {
        Response::State { battle } => {
            assert_eq!(battle.id, BattleId::new(battle_id).unwrap());
            assert_eq!(battle.board_size, 9);
            assert_eq!(battle.robots.len(), 1);
            assert!(battle.dinosaurs.is_empty());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_codes() {
    let service = service();
    let battle_id = create(&service, Some(5)).await;
    let robot = place_robot(&service, battle_id, 1, 1, "south").await;
    let missing = if battle_id == 9999 { 1000 } else { 9999 };

    let cases = vec![
        (Request::State { battle_id: 42 }, "invalid_battle_id"),
        (
            Request::State {
                battle_id: missing,
            },
            "battle_not_found",
        ),
        (
            Request::PlaceRobot {
                battle_id,
                at: Position::new(1, 1).into(),
                direction: "up".to_string(),
            },
            "invalid_direction",
        ),
        (
            Request::PlaceRobot {
                battle_id,
                at: Position::new(6, 1).into(),
                direction: "east".to_string(),
            },
            "out_of_range",
        ),
        (
            Request::PlaceDinosaur {
                battle_id,
                at: Position::new(1, 1).into(),
            },
            "position_occupied",
        ),
        (
            Request::PlaceDinosaur {
                battle_id,
                at: Position::new(i64::MIN, 1).into(),
            },
            "out_of_range",
        ),
        (
            Request::PlaceDinosaur {
                battle_id,
                at: Position::new(2, i64::MIN).into(),
            },
            "out_of_range",
        ),
        (
            Request::PlaceDinosaur {
                battle_id,
                at: PositionInput::Pair {
                    position: "two,three".to_string(),
                },
            },
            "invalid_position",
        ),
        (
            Request::Command {
                battle_id,
                robot: robot.clone(),
                action: "jump".to_string(),
            },
            "invalid_action",
        ),
        (
            Request::Command {
                battle_id,
                robot: "robot-1".to_string(),
                action: "attack".to_string(),
            },
            "invalid_entity_id",
        ),
        (
            Request::Command {
                battle_id,
                robot: "D-0001".to_string(),
                action: "attack".to_string(),
            },
            "robot_not_found",
        ),
        (
            Request::Command {
                battle_id,
                robot: robot.clone(),
                action: "move-backwards".to_string(),
            },
            "blocked",
        ),
    ];

    for (request, expected) in cases {
        let response = service.handle(request.clone()).await;
        assert_eq!(error_code(&response), expected, "request: {request:?}");
    }
}

#[tokio::test]
async fn test_health() {
    let service = service();
    assert_eq!(
        service.handle(Request::Health).await,
        Response::Health {
            status: "pass".to_string()
        }
    );
}

#[tokio::test]
async fn test_driver_answers_every_line() {
    let service = service();
    let input = concat!(
        r#"{"cmd":"health"}"#,
        "\n",
        "not json\n",
        "\n",
        r#"{"cmd":"create_battle","size":4}"#,
        "\n",
    );
    let mut output = Vec::new();
    run_lines(&service, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0], Response::ready());
    assert!(matches!(responses[1], Response::Health { .. }));
    assert_eq!(error_code(&responses[2]), "malformed_request");
    assert!(matches!(
        responses[3],
        Response::BattleCreated { board_size: 4, .. }
    ));
}
