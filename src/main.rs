mod attack;
mod logging;
mod models;
mod rng;
mod scenario;
mod simulation;

use clap::{Arg, Command};
use std::str::FromStr;

use attack::{AttackMode, HighSpoofer, RandomOffsetSpoofer};
use logging::{init_logging, level_for_verbosity, LogConfig, LogOutput};
use models::{math_utils, Position2D, Vehicle};
use rng::SimRng;
use scenario::ScenarioConfig;
use simulation::SimulationEngine;

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("spoofsim")
        .version("0.1.0")
        .about("V2Xビーコンなりすましシミュレーション (V2X Beacon Spoofing Simulation)")
        .long_about("車車間通信の安全ビーコンに対するなりすまし攻撃のシミュレータ\n\
                     時間駆動型シミュレーションでヘディング／ヨーレート改ざん攻撃の挙動を評価します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .long_help("実行するシナリオファイル(.yaml)のパスを指定します。\n\
                           指定しない場合、使用方法とシナリオ一覧が表示されます。")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
                .conflicts_with("test")
        )
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .action(clap::ArgAction::SetTrue)
                .help("モデルの生成テストを実行")
                .conflicts_with("info")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: デバッグ)")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("DEST")
                .help("ログ出力先 (console, file, both)")
        )
        .get_matches();

    println!("V2Xビーコンなりすましシミュレーション - spoofsim v0.1.0");
    println!();

    // 詳細レベルの設定
    let verbose_level = matches.get_count("verbose");
    if verbose_level > 0 {
        println!("詳細出力レベル: {}", verbose_level);
    }

    // ログシステムの初期化
    let log_output = matches
        .get_one::<String>("log-output")
        .map(|s| LogOutput::from_str(s))
        .transpose()
        .unwrap_or_else(|e| {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        })
        .unwrap_or(LogOutput::Console);

    let log_config = LogConfig {
        level: level_for_verbosity(verbose_level),
        output: log_output,
        ..LogConfig::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!("エラー: ログ初期化に失敗しました: {}", e);
        std::process::exit(1);
    }

    // テストモードの実行
    if matches.get_flag("test") {
        println!("=== モデルテストモード ===");
        test_models();
        return;
    }

    // シナリオファイルの処理
    if let Some(scenario_path) = matches.get_one::<String>("scenario") {
        match run_scenario(scenario_path, matches.get_flag("info"), verbose_level) {
            Ok(_) => {
                if verbose_level > 0 {
                    println!("シナリオ実行が正常に完了しました。");
                }
            }
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        // デフォルト動作: 利用可能なシナリオ一覧を表示
        show_default_help();
    }
}

fn test_models() {
    println!("\n=== モデルの生成テスト ===");

    // 車両の作成
    let vehicle = Vehicle::new(
        "V001".to_string(),
        Position2D::new(-1500.0, 0.0),
        math_utils::deg_to_rad(90.0),
        13.9, // 約50km/h
        0.0,
        1.0,
    );
    println!("車両が作成されました: {}", vehicle.id);

    // ビーコンの作成
    let beacon = vehicle.make_beacon(0.0);
    println!(
        "ビーコンが作成されました: {} (heading={:.4}, yaw_rate={:.4})",
        beacon.sender_id,
        beacon.heading(),
        beacon.yaw_rate()
    );

    // 固定ヨーレート戦略の動作確認
    let mut high_spoofer = HighSpoofer::new(AttackMode::YawRate);
    high_spoofer.update(vehicle.prev_heading, vehicle.prev_beacon_time);
    let mut attacked = beacon.clone();
    high_spoofer.attack(&mut attacked, 0.0);
    println!(
        "固定ヨーレート攻撃を適用しました: yaw_rate={:.8} (種別: {})",
        attacked.yaw_rate(),
        attacked.attack_type().unwrap_or("なし")
    );

    // 乱数オフセット戦略の動作確認
    let mut rng = SimRng::new(1, 1);
    let mut random_spoofer = RandomOffsetSpoofer::new(AttackMode::Heading);
    random_spoofer.update(0.5, vehicle.prev_heading, vehicle.prev_beacon_time);
    let mut attacked = beacon.clone();
    random_spoofer.attack(&mut attacked, 0.0, &mut rng);
    println!(
        "乱数オフセット攻撃を適用しました: heading={:.4} (種別: {})",
        attacked.heading(),
        attacked.attack_type().unwrap_or("なし")
    );

    println!("\n全てのモデルが正常に作成されました！");
}

/// シナリオファイルを読み込んで実行
fn run_scenario(scenario_path: &str, info_only: bool, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    // シナリオファイルの読み込み
    let scenario = ScenarioConfig::from_file(scenario_path)?;

    if verbose_level > 0 {
        println!("シナリオファイル読み込み完了: {}", scenario_path);
    }

    // 情報表示のみの場合
    if info_only {
        scenario.print_summary();
        return Ok(());
    }

    // シナリオ実行
    execute_scenario(scenario, verbose_level)?;

    Ok(())
}

/// シナリオの実行
fn execute_scenario(scenario: ScenarioConfig, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    // 基本情報表示
    scenario.print_summary();
    println!();

    if verbose_level > 0 {
        println!("シミュレーション設定:");
        println!("  時間刻み: {:.3}秒", scenario.sim.dt_s);
        println!("  最大時間: {:.1}秒", scenario.sim.t_max_s);
        println!("  シード値: {}", scenario.sim.seed);
        println!();
    }

    // シミュレーションエンジンの作成と初期化
    let mut simulation = SimulationEngine::new(scenario, verbose_level);
    simulation.initialize()?;

    // シミュレーション実行
    simulation.run()?;

    Ok(())
}

/// デフォルトヘルプとシナリオ一覧を表示
fn show_default_help() {
    println!("使用方法:");
    println!("  spoofsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>  シナリオファイルを指定して実行");
    println!("  -i, --info             シナリオ情報のみ表示");
    println!("  -t, --test             モデルの生成テスト実行");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("      --log-output <DEST> ログ出力先 (console, file, both)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  scenarios/scenario_high_yawrate.yaml    - 固定ヨーレート攻撃");
    println!("  scenarios/scenario_random_offset.yaml   - 乱数オフセット攻撃");
    println!();
    println!("例:");
    println!("  spoofsim -s scenarios/scenario_high_yawrate.yaml");
    println!("  spoofsim -s scenarios/scenario_random_offset.yaml -v");
    println!("  spoofsim -s scenarios/scenario_high_yawrate.yaml -i");
    println!("  spoofsim --test");
}
