//! # Simulation モジュール
//!
//! ビーコンなりすましシミュレーションの中核となるシミュレーションエンジンを提供します。
//!
//! このモジュールは、固定時間刻み（Δt）の時間駆動シミュレーションのメインループを
//! 管理し、車両の運動更新と周期的なビーコン送信、攻撃車両によるビーコン改ざんを
//! 制御します。
//!
//! ## 主要機能
//!
//! - **シミュレーションループ管理**: 固定時間刻みによる時間進行制御
//! - **ビーコンスケジューリング**: 車両ごとの送信間隔管理
//! - **攻撃適用**: 送信直前のupdate→attack呼び出し順序の保証
//! - **送信統計**: 攻撃種別ラベルごとの改ざんビーコン集計
//!
//! ## シミュレーション処理順序
//!
//! 各時間刻みにおいて、以下の順序で処理が実行されます：
//!
//! 1. **車両処理**: 全車両の運動更新（ヘディング変化、移動、領域外判定）
//! 2. **ビーコン処理**: 送信時刻に達した車両の真値ビーコン生成、
//!    攻撃車両の場合は戦略による改ざん、送信記録と統計更新
//!
//! ## 使用例
//!
//! ```rust
//! use spoofsim::simulation::SimulationEngine;
//! use spoofsim::scenario::ScenarioConfig;
//!
//! // シナリオファイルを読み込み
//! let config = ScenarioConfig::from_file("scenarios/scenario_high_yawrate.yaml")?;
//!
//! // シミュレーションエンジンを作成
//! let mut engine = SimulationEngine::new(config, 1); // verbose_level=1
//!
//! // 初期化とシミュレーション実行
//! engine.initialize()?;
//! engine.run()?;
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::attack::{AttackMode, HighSpoofer, RandomOffsetSpoofer, SpoofStrategy};
use crate::models::{math_utils, IAgent, Position2D, Vehicle};
use crate::rng::SimRng;
use crate::scenario::ScenarioConfig;
use tracing::{debug, info, trace, warn};

/// 1回のシミュレーション実行で許容する最大ステップ数
const MAX_STEPS: u64 = 10000;

/// 攻撃車両ごとの実行時状態
pub struct AttackerState {
    /// 攻撃戦略（戦略ごとの内部状態を含む）
    pub strategy: SpoofStrategy,
    /// 摂動区間の半幅（ラジアン、random_offsetのみ使用）
    pub offset_rad: f64,
}

/// ビーコン送信統計
#[derive(Debug, Default)]
pub struct TransmissionStats {
    /// 送信ビーコン総数
    pub beacons_sent: u64,
    /// 改ざんされたビーコン数
    pub beacons_attacked: u64,
    /// 攻撃種別ラベルごとの件数
    pub label_counts: BTreeMap<String, u64>,
}

pub struct SimulationEngine {
    pub current_time: f64,
    pub dt: f64,
    pub max_time: f64,
    pub seed: u64,
    pub step_count: u64,

    pub vehicles: Vec<Vehicle>,
    pub attackers: HashMap<String, AttackerState>,
    pub rng: SimRng,
    pub stats: TransmissionStats,

    pub scenario_config: ScenarioConfig,
    pub verbose_level: u8,
}

impl SimulationEngine {
    pub fn new(scenario: ScenarioConfig, verbose_level: u8) -> Self {
        let dt = scenario.sim.dt_s;
        let max_time = scenario.sim.t_max_s;
        let seed = scenario.sim.seed;

        Self {
            current_time: 0.0,
            dt,
            max_time,
            seed,
            step_count: 0,
            vehicles: Vec::new(),
            attackers: HashMap::new(),
            rng: SimRng::new(seed, 1),
            stats: TransmissionStats::default(),
            scenario_config: scenario,
            verbose_level,
        }
    }

    pub fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.verbose_level > 0 {
            info!("シミュレーションエンジンを初期化中...");
        }

        self.initialize_vehicles()?;

        if self.verbose_level > 0 {
            info!("初期化完了:");
            info!("  車両: {}台", self.vehicles.len());
            info!("  攻撃車両: {}台", self.attackers.len());
        }

        Ok(())
    }

    fn initialize_vehicles(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        for vehicle_config in &self.scenario_config.vehicles {
            let mut vehicle = Vehicle::new(
                vehicle_config.id.clone(),
                Position2D::new(vehicle_config.pos.x_m, vehicle_config.pos.y_m),
                math_utils::deg_to_rad(vehicle_config.heading_deg),
                vehicle_config.speed_mps,
                math_utils::deg_to_rad(vehicle_config.yaw_rate_deg_s),
                vehicle_config.beacon_interval_s,
            );

            vehicle.initialize(&self.scenario_config);

            if let Some(attacker_config) = &vehicle_config.attacker {
                // 検証済み設定のため未知の値はここに到達しない
                let mode = attacker_config.attack_mode().unwrap_or(AttackMode::Both);
                let strategy = match attacker_config.strategy.as_str() {
                    "high" => SpoofStrategy::High(HighSpoofer::new(mode)),
                    _ => SpoofStrategy::RandomOffset(RandomOffsetSpoofer::new(mode)),
                };
                let offset_rad = attacker_config.offset_rad.unwrap_or(0.0);

                self.attackers.insert(
                    vehicle_config.id.clone(),
                    AttackerState { strategy, offset_rad },
                );

                if self.verbose_level > 1 {
                    debug!(
                        "攻撃車両初期化: {} (戦略: {}, モード: {})",
                        vehicle_config.id, attacker_config.strategy, attacker_config.mode
                    );
                }
            } else if self.verbose_level > 1 {
                debug!(
                    "車両初期化: {} (速度: {:.1}m/s, 送信間隔: {:.1}秒)",
                    vehicle_config.id, vehicle_config.speed_mps, vehicle_config.beacon_interval_s
                );
            }

            self.vehicles.push(vehicle);
        }

        Ok(())
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("=== シミュレーション実行開始 ===");

        while self.current_time < self.max_time {
            self.step();

            if self.verbose_level > 2 {
                trace!("時刻: {:.1}秒 (ステップ: {})", self.current_time, self.step_count);
            }

            if self.step_count % 100 == 0 && self.verbose_level > 0 {
                let progress = (self.current_time / self.max_time) * 100.0;
                info!("進行状況: {:.1}% ({:.1}/{:.1}秒)", progress, self.current_time, self.max_time);
            }

            if self.step_count > MAX_STEPS {
                warn!("ステップ数上限({})に到達、シミュレーションを打ち切ります", MAX_STEPS);
                break;
            }
        }

        info!("=== シミュレーション完了 ===");
        info!("実行時間: {:.1}秒", self.current_time);
        info!("総ステップ数: {}", self.step_count);
        info!("送信ビーコン総数: {}", self.stats.beacons_sent);
        info!("改ざんビーコン数: {}", self.stats.beacons_attacked);
        for (label, count) in &self.stats.label_counts {
            info!("  {}: {}件", label, count);
        }

        Ok(())
    }

    fn step(&mut self) {
        self.process_beacons();
        self.process_vehicles();

        self.current_time += self.dt;
        self.step_count += 1;
    }

    fn process_vehicles(&mut self) {
        for vehicle in &mut self.vehicles {
            if vehicle.is_active() {
                vehicle.tick(self.dt);
            }
        }
    }

    fn process_beacons(&mut self) {
        let now = self.current_time;

        for vehicle in &mut self.vehicles {
            if !vehicle.is_active() || !vehicle.beacon_due(now) {
                continue;
            }

            // 真の運動状態のスナップショットを生成
            let mut beacon = vehicle.make_beacon(now);

            // 攻撃車両の場合、直前ビーコン時点の真値でupdateしてからattack
            if let Some(attacker) = self.attackers.get_mut(&vehicle.id) {
                match &mut attacker.strategy {
                    SpoofStrategy::High(spoofer) => {
                        spoofer.update(vehicle.prev_heading, vehicle.prev_beacon_time);
                    }
                    SpoofStrategy::RandomOffset(spoofer) => {
                        spoofer.update(
                            attacker.offset_rad,
                            vehicle.prev_heading,
                            vehicle.prev_beacon_time,
                        );
                    }
                }
                attacker.strategy.attack(&mut beacon, now, &mut self.rng);
            }

            vehicle.record_beacon(now);

            self.stats.beacons_sent += 1;
            match beacon.attack_type() {
                Some(label) => {
                    self.stats.beacons_attacked += 1;
                    *self.stats.label_counts.entry(label.to_string()).or_insert(0) += 1;
                    info!(
                        "改ざんビーコン送信: {} (t={:.1}秒, 種別: {}, heading={:.4}, yaw_rate={:.4})",
                        beacon.sender_id, now, label, beacon.heading(), beacon.yaw_rate()
                    );
                }
                None => {
                    debug!(
                        "ビーコン送信: {} (t={:.1}秒, heading={:.4}, yaw_rate={:.4})",
                        beacon.sender_id, now, beacon.heading(), beacon.yaw_rate()
                    );
                }
            }
        }
    }
}
