//! # 场景播放集成测试
//!
//! 测试 HostConfig → FrameClock → TweenComponentManager → SpriteTarget 的完整链路。
//! 帧由手动推进的调度器驱动，不依赖真实时间。

use host_cli::{DriveMode, HostConfig, SceneReport, run_scene};
use scene_runtime::{NameMatch, Point, SceneConfig, TweenConfig, TweenCurveConfig, TweenOption};

fn bezier_move(target: &str, ending: Point, total_time: f64) -> TweenConfig {
    TweenConfig {
        curve: TweenCurveConfig::Bezier {
            p1: Point::new(0.25, 0.1),
            p2: Point::new(0.25, 1.0),
        },
        option: TweenOption::Move,
        initial: Point::zero(),
        ending,
        total_time,
        target_name: target.to_string(),
        name_match: NameMatch::Exact,
    }
}

fn hero_config(seconds: f64) -> HostConfig {
    HostConfig {
        seconds,
        scene: SceneConfig {
            targets: vec!["hero".to_string()],
            tweens: vec![bezier_move("hero", Point::new(100.0, 0.0), 1.0)],
            ..SceneConfig::default()
        },
        ..HostConfig::default()
    }
}

fn sprite_position(report: &SceneReport, name: &str) -> Point {
    report
        .sprites
        .iter()
        .find(|sprite| sprite.name == name)
        .map(|sprite| sprite.transform.position)
        .unwrap()
}

/// 贝塞尔位移：60fps 下推进 1 秒后到达终点
#[test]
fn test_bezier_move_one_second_at_60fps() {
    let report = run_scene(&hero_config(1.0)).unwrap();
    assert_eq!(report.frames, 61);

    let position = sprite_position(&report, "hero");
    assert!((position.x - 100.0).abs() < 1e-4, "x = {}", position.x);
    assert_eq!(position.y, 0.0);
}

/// 完成回调只触发一次，之后的帧不再推进补间
#[test]
fn test_finished_exactly_once() {
    let report = run_scene(&hero_config(3.0)).unwrap();
    assert_eq!(report.finished_tweens, 1);
    assert_eq!(report.running_tweens, 0);
    assert_eq!(sprite_position(&report, "hero"), Point::new(100.0, 0.0));
}

#[test]
fn test_host_ticker_mode_matches_self_driven() {
    let mut config = hero_config(1.5);
    let self_driven = run_scene(&config).unwrap();

    config.drive_mode = DriveMode::HostTicker;
    let host_ticker = run_scene(&config).unwrap();

    assert_eq!(
        sprite_position(&self_driven, "hero"),
        sprite_position(&host_ticker, "hero")
    );
    // 首帧不渲染
    assert_eq!(self_driven.renders, self_driven.frames - 1);
    // 宿主驱动模式下由宿主自行渲染
    assert_eq!(host_ticker.renders, 0);
}

/// 顺序模式：a 完成后 b 才开始，c 尚未启动
#[test]
fn test_sequential_scene() {
    let config = HostConfig {
        seconds: 0.75,
        scene: SceneConfig {
            parallel: false,
            targets: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            tweens: vec![
                bezier_move("a", Point::new(10.0, 0.0), 0.5),
                bezier_move("b", Point::new(10.0, 0.0), 0.5),
                bezier_move("c", Point::new(10.0, 0.0), 0.5),
            ],
            ..SceneConfig::default()
        },
        ..HostConfig::default()
    };

    let report = run_scene(&config).unwrap();
    assert_eq!(report.finished_tweens, 1);
    assert_eq!(report.running_tweens, 1);
    assert_eq!(sprite_position(&report, "a"), Point::new(10.0, 0.0));
    let b = sprite_position(&report, "b");
    assert!(b.x > 0.0 && b.x < 10.0);
    assert_eq!(sprite_position(&report, "c"), Point::zero());
}

#[test]
fn test_sequential_scene_runs_to_completion() {
    let config = HostConfig {
        seconds: 2.0,
        scene: SceneConfig {
            parallel: false,
            targets: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            tweens: vec![
                bezier_move("a", Point::new(10.0, 0.0), 0.5),
                bezier_move("b", Point::new(20.0, 0.0), 0.5),
                bezier_move("c", Point::new(30.0, 0.0), 0.5),
            ],
            ..SceneConfig::default()
        },
        ..HostConfig::default()
    };

    let report = run_scene(&config).unwrap();
    assert_eq!(report.finished_tweens, 3);
    assert_eq!(sprite_position(&report, "c"), Point::new(30.0, 0.0));
}

#[test]
fn test_demo_scene() {
    let report = run_scene(&HostConfig::default()).unwrap();
    assert_eq!(report.finished_tweens, 2);

    let coin = report
        .sprites
        .iter()
        .find(|sprite| sprite.name == "coin_01")
        .unwrap();
    // Akima 曲线在最后一个节点上精确取值 0
    assert_eq!(coin.transform.opacity, 0.0);
}

#[test]
fn test_unbound_target_fails() {
    let mut config = hero_config(1.0);
    config.scene.targets.clear();
    assert!(run_scene(&config).is_err());
}

#[test]
fn test_invalid_curve_fails() {
    let mut config = hero_config(1.0);
    config.scene.tweens[0].curve = TweenCurveConfig::AkimaSpline {
        points: vec![Point::zero(), Point::one()],
    };
    let error = run_scene(&config).unwrap_err();
    assert!(format!("{error:#}").contains("补间构造失败"));
}

#[test]
fn test_oversized_duration_is_rejected() {
    let config = hero_config(1e300);
    let err = run_scene(&config).unwrap_err();
    assert!(format!("{err:#}").contains("场景配置无效"));
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.json");

    let mut config = hero_config(1.25);
    config.drive_mode = DriveMode::HostTicker;
    config.fps = 30;
    config.save(&path).unwrap();

    let loaded = HostConfig::load(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_unparsable_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(HostConfig::load(&path), HostConfig::default());
}
