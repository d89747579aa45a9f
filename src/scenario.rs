use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::attack::AttackMode;

/// シナリオメタデータ
#[derive(Debug, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

/// シミュレーション設定
#[derive(Debug, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub dt_s: f64,
    pub t_max_s: f64,
    pub seed: u64,
}

/// 世界設定
#[derive(Debug, Deserialize, Serialize)]
pub struct WorldConfig {
    pub region_rect: RegionRect,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RegionRect {
    pub xmin_m: f64,
    pub xmax_m: f64,
    pub ymin_m: f64,
    pub ymax_m: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Position2D {
    pub x_m: f64,
    pub y_m: f64,
}

/// 車両設定
#[derive(Debug, Deserialize, Serialize)]
pub struct VehicleConfig {
    pub id: String,
    pub pos: Position2D,
    pub heading_deg: f64,
    pub speed_mps: f64,
    pub yaw_rate_deg_s: f64,
    pub beacon_interval_s: f64,
    /// 攻撃者設定（省略時は正規車両）
    pub attacker: Option<AttackerConfig>,
}

/// 攻撃者設定
#[derive(Debug, Deserialize, Serialize)]
pub struct AttackerConfig {
    /// 攻撃戦略 ("high" または "random_offset")
    pub strategy: String,
    /// 攻撃モード ("heading", "yaw_rate", "both")
    pub mode: String,
    /// 摂動区間の半幅（ラジアン、random_offsetのみ）
    pub offset_rad: Option<f64>,
}

impl AttackerConfig {
    /// モード文字列を攻撃モードに変換
    pub fn attack_mode(&self) -> Option<AttackMode> {
        match self.mode.as_str() {
            "heading" => Some(AttackMode::Heading),
            "yaw_rate" => Some(AttackMode::YawRate),
            "both" => Some(AttackMode::Both),
            _ => None,
        }
    }
}

/// 完全なシナリオ設定
#[derive(Debug, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    pub sim: SimulationConfig,
    pub world: WorldConfig,
    pub vehicles: Vec<VehicleConfig>,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        // ファイル読み込み
        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        // YAML解析
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        // 基本的な検証
        config.validate()?;

        Ok(config)
    }

    /// 設定の基本的な検証
    ///
    /// 攻撃オフセット幅の範囲はここでは検証しません。範囲外の値は
    /// 攻撃戦略側の実行時クランプ（ビーコン無変更）で扱われます。
    pub fn validate(&self) -> Result<(), ScenarioError> {
        // 時間設定の検証
        if self.sim.dt_s <= 0.0 {
            return Err(ScenarioError::ValidationError("dt_s must be positive".to_string()));
        }
        if self.sim.t_max_s <= 0.0 {
            return Err(ScenarioError::ValidationError("t_max_s must be positive".to_string()));
        }

        // 座標範囲の検証
        let region = &self.world.region_rect;
        if region.xmin_m >= region.xmax_m || region.ymin_m >= region.ymax_m {
            return Err(ScenarioError::ValidationError("Invalid region bounds".to_string()));
        }

        // 車両設定の検証
        let mut seen_ids = HashSet::new();
        for vehicle in &self.vehicles {
            if !seen_ids.insert(&vehicle.id) {
                return Err(ScenarioError::ValidationError(
                    format!("Duplicate vehicle id: {}", vehicle.id)
                ));
            }

            if vehicle.beacon_interval_s <= 0.0 {
                return Err(ScenarioError::ValidationError(
                    format!("Vehicle {} beacon_interval_s must be positive", vehicle.id)
                ));
            }

            if vehicle.speed_mps < 0.0 {
                return Err(ScenarioError::ValidationError(
                    format!("Vehicle {} speed_mps must be non-negative", vehicle.id)
                ));
            }

            if !self.is_position_in_bounds(vehicle.pos.x_m, vehicle.pos.y_m) {
                return Err(ScenarioError::ValidationError(
                    format!("Vehicle {} outside region bounds", vehicle.id)
                ));
            }

            // 攻撃者設定の検証
            if let Some(attacker) = &vehicle.attacker {
                match attacker.strategy.as_str() {
                    "high" => {}
                    "random_offset" => {
                        if attacker.offset_rad.is_none() {
                            return Err(ScenarioError::ValidationError(
                                format!("Vehicle {} random_offset strategy requires offset_rad", vehicle.id)
                            ));
                        }
                    }
                    other => {
                        return Err(ScenarioError::ValidationError(
                            format!("Vehicle {} unknown attack strategy: {}", vehicle.id, other)
                        ));
                    }
                }

                if attacker.attack_mode().is_none() {
                    return Err(ScenarioError::ValidationError(
                        format!("Vehicle {} unknown attack mode: {}", vehicle.id, attacker.mode)
                    ));
                }
            }
        }

        Ok(())
    }

    /// 位置が領域内かどうかをチェック
    fn is_position_in_bounds(&self, x: f64, y: f64) -> bool {
        let region = &self.world.region_rect;
        x >= region.xmin_m && x <= region.xmax_m &&
        y >= region.ymin_m && y <= region.ymax_m
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== シミュレーション設定 ===");
        println!("時間刻み: {:.3}秒", self.sim.dt_s);
        println!("最大時間: {:.1}秒 ({:.1}分)", self.sim.t_max_s, self.sim.t_max_s / 60.0);
        println!("シード値: {}", self.sim.seed);
        println!();

        println!("=== 車両 ===");
        println!("車両数: {}台", self.vehicles.len());
        let attacker_count = self.vehicles.iter().filter(|v| v.attacker.is_some()).count();
        println!("攻撃車両数: {}台", attacker_count);

        for vehicle in &self.vehicles {
            match &vehicle.attacker {
                Some(attacker) => {
                    println!(
                        "  {}: 攻撃車両 (戦略: {}, モード: {})",
                        vehicle.id, attacker.strategy, attacker.mode
                    );
                }
                None => {
                    println!("  {}: 正規車両", vehicle.id);
                }
            }
        }
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_yaml() -> &'static str {
        r#"
meta:
  version: "1.0"
  name: "test"
  description: "test scenario"
sim:
  dt_s: 0.1
  t_max_s: 60.0
  seed: 42
world:
  region_rect:
    xmin_m: -2000.0
    xmax_m: 2000.0
    ymin_m: -2000.0
    ymax_m: 2000.0
vehicles:
  - id: "V001"
    pos: { x_m: 0.0, y_m: 0.0 }
    heading_deg: 90.0
    speed_mps: 13.9
    yaw_rate_deg_s: 0.0
    beacon_interval_s: 1.0
  - id: "V002"
    pos: { x_m: 100.0, y_m: 0.0 }
    heading_deg: 0.0
    speed_mps: 10.0
    yaw_rate_deg_s: 2.0
    beacon_interval_s: 1.0
    attacker:
      strategy: "random_offset"
      mode: "both"
      offset_rad: 0.5
"#
    }

    fn parse(yaml: &str) -> ScenarioConfig {
        serde_yaml::from_str(yaml).expect("YAML should parse")
    }

    #[test]
    fn test_valid_scenario_passes() {
        let config = parse(base_yaml());
        assert!(config.validate().is_ok());
        assert_eq!(config.vehicles.len(), 2);
        assert!(config.vehicles[0].attacker.is_none());
        let attacker = config.vehicles[1].attacker.as_ref().unwrap();
        assert_eq!(attacker.attack_mode(), Some(AttackMode::Both));
        assert_eq!(attacker.offset_rad, Some(0.5));
    }

    #[test]
    fn test_non_positive_dt_rejected() {
        let yaml = base_yaml().replace("dt_s: 0.1", "dt_s: 0.0");
        assert!(parse(&yaml).validate().is_err());
    }

    #[test]
    fn test_duplicate_vehicle_id_rejected() {
        let yaml = base_yaml().replace("id: \"V002\"", "id: \"V001\"");
        assert!(parse(&yaml).validate().is_err());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let yaml = base_yaml().replace("strategy: \"random_offset\"", "strategy: \"teleport\"");
        assert!(parse(&yaml).validate().is_err());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let yaml = base_yaml().replace("mode: \"both\"", "mode: \"speed\"");
        assert!(parse(&yaml).validate().is_err());
    }

    #[test]
    fn test_random_offset_requires_offset_rad() {
        let yaml = base_yaml().replace("      offset_rad: 0.5\n", "");
        assert!(parse(&yaml).validate().is_err());
    }

    #[test]
    fn test_out_of_range_offset_is_not_rejected() {
        // 範囲外オフセットは実行時クランプの対象であり、設定検証では許容する
        let yaml = base_yaml().replace("offset_rad: 0.5", "offset_rad: 7.0");
        assert!(parse(&yaml).validate().is_ok());
    }

    #[test]
    fn test_vehicle_outside_region_rejected() {
        let yaml = base_yaml().replace("pos: { x_m: 100.0, y_m: 0.0 }", "pos: { x_m: 9999.0, y_m: 0.0 }");
        assert!(parse(&yaml).validate().is_err());
    }
}
