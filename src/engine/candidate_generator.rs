// ==========================================
// 模块化结构配置器 - 候选尺寸生成
// ==========================================
// 职责: 围绕目标值生成局部邻域候选 (非全值域扫描)
// 输出: 有限、去重、按与目标距离升序排列的尺寸序列
// ==========================================

use crate::config::constraint_model::NumericDomain;

/// 保留小数位 (消除步长累加的浮点噪声)
const ROUND_DECIMALS: f64 = 1e6;

// ==========================================
// CandidateGenerator - 纯函数工具类
// ==========================================
pub struct CandidateGenerator;

impl CandidateGenerator {
    /// 将值吸附到值域内最近的步长网格点
    ///
    /// # 规则
    /// - 先夹到 [min, max], 再按 min 起点的步长取最近网格点
    /// - 恰好位于两网格点中间时取较小者
    /// - 网格点超出 max 时取不超过 max 的最大网格点
    /// - 无步长值域只做夹取
    pub fn snap_to_step(value: f64, domain: &NumericDomain) -> f64 {
        let clamped = value.clamp(domain.min, domain.max);
        let step = match domain.step {
            Some(s) if s > 0.0 => s,
            _ => return round6(clamped),
        };

        let k = (clamped - domain.min) / step;
        let lower = k.floor();
        let n = if k - lower > 0.5 { lower + 1.0 } else { lower };

        let mut snapped = domain.min + n * step;
        if snapped > domain.max {
            snapped = domain.min + ((domain.max - domain.min) / step).floor() * step;
        }
        round6(snapped)
    }

    /// 生成单个尺寸的候选序列
    ///
    /// # 参数
    /// - target: 目标值 (None 或非有限值时以值域中点为目标)
    /// - domain: 尺寸值域
    /// - breadth: 中心向两侧扩展的步数
    ///
    /// # 返回
    /// 以 {中心, min, max, 中心±1步, 中心±2步, ...} 构造, 吸附去重后
    /// 按与未吸附目标的距离升序稳定排序
    pub fn dim_candidates(target: Option<f64>, domain: &NumericDomain, breadth: usize) -> Vec<f64> {
        let anchor = target
            .filter(|t| t.is_finite())
            .unwrap_or_else(|| domain.midpoint());
        let center = Self::snap_to_step(anchor, domain);

        let mut raw = vec![center, domain.min, domain.max];
        if let Some(step) = domain.step.filter(|s| *s > 0.0) {
            // 超出值域跨度的步数吸附后只会落在 min/max 上
            let span_steps = ((domain.max - domain.min) / step).ceil().max(0.0) as usize;
            for i in 1..=breadth.min(span_steps) {
                let offset = step * i as f64;
                raw.push(center + offset);
                raw.push(center - offset);
            }
        }

        let mut out: Vec<f64> = Vec::with_capacity(raw.len());
        for v in raw {
            let snapped = Self::snap_to_step(v, domain);
            if !out.contains(&snapped) {
                out.push(snapped);
            }
        }

        out.sort_by(|a, b| (a - anchor).abs().total_cmp(&(b - anchor).abs()));
        out
    }
}

fn round6(v: f64) -> f64 {
    (v * ROUND_DECIMALS).round() / ROUND_DECIMALS
}
