use crate::models::{
    beacon::SafetyBeacon,
    common::{math_utils, AgentStatus, Position2D},
    traits::IAgent,
};
use tracing::debug;

/// ビーコン送信間隔の比較に用いる許容誤差（秒）
///
/// シミュレーション時刻はdtの累積加算で進むため、浮動小数の丸め誤差を吸収します。
const BEACON_DUE_TOLERANCE: f64 = 1e-9;

/// 車両エージェント
///
/// 路面平面上を走行し、周期的に安全ビーコンをブロードキャストする車両です。
/// ヨーレートに従ってヘディングが変化し、ヘディング方向に等速で移動します。
/// 直前に送信したビーコン時点の真のヘディングと送信時刻を記憶しており、
/// 攻撃戦略のupdate呼び出しに供給されます。
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// 車両の一意識別子
    pub id: String,
    /// 車両の現在位置
    pub position: Position2D,
    /// 走行速度（m/s）
    pub speed: f64,
    /// 真のヘディング（ラジアン、[0, 2π)に維持）
    pub heading: f64,
    /// 真のヨーレート（rad/s）
    pub yaw_rate: f64,
    /// ビーコン送信間隔（秒）
    pub beacon_interval: f64,
    /// 車両の現在状態
    pub status: AgentStatus,
    /// 最後にビーコンを送信した時刻（未送信の場合None）
    pub last_beacon_time: Option<f64>,
    /// 直前ビーコン送信時点の真のヘディング（ラジアン）
    pub prev_heading: f64,
    /// 直前ビーコンの送信時刻（秒）
    pub prev_beacon_time: f64,
    /// 走行領域の境界 (xmin, xmax, ymin, ymax)
    region_bounds: (f64, f64, f64, f64),
}

impl Vehicle {
    /// 新しい車両を作成します
    ///
    /// # 引数
    ///
    /// * `id` - 車両の一意識別子
    /// * `position` - 初期位置
    /// * `heading` - 初期ヘディング（ラジアン）
    /// * `speed` - 走行速度（m/s）
    /// * `yaw_rate` - ヨーレート（rad/s）
    /// * `beacon_interval` - ビーコン送信間隔（秒）
    ///
    /// # 戻り値
    ///
    /// 初期化された車両インスタンス（initializeメソッドで領域境界の設定が必要）
    pub fn new(
        id: String,
        position: Position2D,
        heading: f64,
        speed: f64,
        yaw_rate: f64,
        beacon_interval: f64,
    ) -> Self {
        Self {
            id,
            position,
            speed,
            heading: math_utils::normalize_heading(heading),
            yaw_rate,
            beacon_interval,
            status: AgentStatus::Active,
            last_beacon_time: None,
            // 初回ビーコンまでの直前状態はゼロ値（未観測の縮退ケース）
            prev_heading: 0.0,
            prev_beacon_time: 0.0,
            region_bounds: (f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// ビーコン送信時刻に達したかどうかを判定
    ///
    /// # 引数
    ///
    /// * `current_time` - 現在のシミュレーション時刻（秒）
    pub fn beacon_due(&self, current_time: f64) -> bool {
        match self.last_beacon_time {
            None => true,
            Some(last) => current_time - last + BEACON_DUE_TOLERANCE >= self.beacon_interval,
        }
    }

    /// 現在の真の運動状態からビーコンを生成
    ///
    /// 生成されるビーコンは改ざん前の真値スナップショットです。
    /// 直前ビーコンの記録は更新しません（record_beaconで行います）。
    ///
    /// # 引数
    ///
    /// * `current_time` - 現在のシミュレーション時刻（秒）
    pub fn make_beacon(&self, current_time: f64) -> SafetyBeacon {
        SafetyBeacon::new(
            self.id.clone(),
            current_time,
            self.position,
            self.speed,
            self.heading,
            self.yaw_rate,
        )
    }

    /// ビーコン送信を記録
    ///
    /// 送信完了後に呼び出し、次回の攻撃update用に今回の真のヘディングと
    /// 送信時刻を記憶します。
    ///
    /// # 引数
    ///
    /// * `current_time` - ビーコンを送信した時刻（秒）
    pub fn record_beacon(&mut self, current_time: f64) {
        self.prev_heading = self.heading;
        self.prev_beacon_time = current_time;
        self.last_beacon_time = Some(current_time);
    }

    /// 領域外判定をチェック
    ///
    /// 車両が走行領域外に出た場合、状態をOutOfBoundsに変更して
    /// 以降のビーコン送信を停止します。
    pub fn check_out_of_bounds(&mut self) {
        let (xmin, xmax, ymin, ymax) = self.region_bounds;
        if self.status == AgentStatus::Active && !self.position.is_in_rect(xmin, xmax, ymin, ymax) {
            self.status = AgentStatus::OutOfBounds;
            debug!("車両が領域外に退出: {} (位置: {:.0}, {:.0})", self.id, self.position.x, self.position.y);
        }
    }
}

impl IAgent for Vehicle {
    fn initialize(&mut self, scenario_config: &crate::scenario::ScenarioConfig) {
        let region = &scenario_config.world.region_rect;
        self.region_bounds = (region.xmin_m, region.xmax_m, region.ymin_m, region.ymax_m);
    }

    fn tick(&mut self, dt: f64) {
        if self.status != AgentStatus::Active {
            return;
        }

        // ヨーレートによるヘディング変化
        self.heading = math_utils::normalize_heading(self.heading + self.yaw_rate * dt);

        // ヘディング方向への等速移動
        self.position = self.position
            + Position2D::new(
                self.speed * dt * self.heading.cos(),
                self.speed * dt * self.heading.sin(),
            );

        self.check_out_of_bounds();
    }

    fn get_id(&self) -> String {
        self.id.clone()
    }

    fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }
}
