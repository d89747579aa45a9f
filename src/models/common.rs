use std::ops::{Add, Sub};

/// 路面平面上の2次元位置を表す構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position2D {
    pub x: f64, // m
    pub y: f64, // m
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 2点間の距離を計算
    pub fn distance(&self, other: &Position2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// 指定された矩形領域内かどうかを判定
    pub fn is_in_rect(&self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> bool {
        self.x >= xmin && self.x <= xmax && self.y >= ymin && self.y <= ymax
    }
}

impl Add for Position2D {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// エージェントの状態を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentStatus {
    Active,      // アクティブ
    OutOfBounds, // 領域外に退出
    Inactive,    // 非アクティブ
}

/// 数学ユーティリティ関数
pub mod math_utils {
    use std::f64::consts::TAU;

    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// ラジアンを度に変換
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }

    /// ヘディング角を[0, 2π)の範囲に正規化
    ///
    /// 入力は任意の実数値（負値・2πを超える値も可）。
    /// NaN/Infinityはそのまま結果に伝播します。
    pub fn normalize_heading(angle_rad: f64) -> f64 {
        let normalized = angle_rad.rem_euclid(TAU);
        // 微小な負の入力では丸めにより2πちょうどになり得るため0に折り返す
        if normalized >= TAU { 0.0 } else { normalized }
    }
}
