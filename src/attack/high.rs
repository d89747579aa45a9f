use crate::attack::{compute_new_heading, AttackMode};
use crate::models::SafetyBeacon;

/// 固定ヨーレート攻撃で使用するヨーレート値（rad/s）
///
/// ETSI TS 102 894-2で定義される最大表現可能ヨーレート
/// 327.66 deg/s（約5.7187 rad/s）を僅かに超える327.67 deg/s相当の値。
pub const K_YAW_RATE: f64 = 5.71892036;

/// 固定ヨーレート置き換え戦略
///
/// ビーコンのヨーレートを規格上の限界値を超える固定値に置き換えます。
/// Bothモードでは置き換え後のヨーレートと整合する新ヘディングも導出します。
/// Headingモードは何も行いません（「高ヘディング」攻撃は存在しません）。
#[derive(Debug, Clone)]
pub struct HighSpoofer {
    /// 改ざん対象フィールドの選択（インスタンスごとに固定）
    mode: AttackMode,
    /// 直前ビーコン時点の真のヘディング（ラジアン）
    prev_heading: f64,
    /// 直前ビーコンの送信時刻（秒）
    prev_beacon_time: f64,
}

impl HighSpoofer {
    /// 新しい戦略インスタンスを作成します
    ///
    /// # 引数
    ///
    /// * `mode` - 攻撃モード
    pub fn new(mode: AttackMode) -> Self {
        Self {
            mode,
            prev_heading: 0.0,
            prev_beacon_time: 0.0,
        }
    }

    /// 直前ビーコン時点の真の状態を記録
    ///
    /// 検証は行わず、無条件に上書きします。
    ///
    /// # 引数
    ///
    /// * `prev_heading` - 直前ビーコン時点の真のヘディング（ラジアン）
    /// * `prev_beacon_time` - 直前ビーコンの送信時刻（秒）
    pub fn update(&mut self, prev_heading: f64, prev_beacon_time: f64) {
        self.prev_heading = prev_heading;
        self.prev_beacon_time = prev_beacon_time;
    }

    /// 送信ビーコンをその場で改ざん
    ///
    /// # 引数
    ///
    /// * `beacon` - 改ざん対象の送信ビーコン
    /// * `current_time` - 現在のシミュレーション時刻（秒）
    pub fn attack(&self, beacon: &mut SafetyBeacon, current_time: f64) {
        match self.mode {
            AttackMode::Heading => {
                // 高ヘディング攻撃は存在しない
            }
            AttackMode::YawRate => {
                beacon.set_attack_type("HighYawRate");
                beacon.set_yaw_rate(K_YAW_RATE);
            }
            AttackMode::Both => {
                beacon.set_attack_type("HighHeadingYawRate");
                beacon.set_yaw_rate(K_YAW_RATE);

                // 置き換え後のヨーレートで直前ヘディングからの変化量を積分
                let new_heading = compute_new_heading(
                    self.prev_heading,
                    K_YAW_RATE,
                    self.prev_beacon_time,
                    current_time,
                );
                beacon.set_heading(new_heading);
            }
        }
    }
}
