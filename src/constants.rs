/// "下一个可学习日" 向前搜索的最大天数，超过即视为配置错误
pub const WEEKDAY_SEARCH_WINDOW_DAYS: i64 = 14;

/// 应用（Practice）阶段最短时长（分钟）
pub const MIN_PRACTICE_MINUTES: i64 = 15;

/// 复习（Review）阶段最短时长（分钟）
pub const MIN_REVIEW_MINUTES: i64 = 10;

/// 题目优先级下限
pub const MIN_PRIORITY: i32 = 1;

/// 题目优先级上限
pub const MAX_PRIORITY: i32 = 5;

/// 高权重题目占比超过此值时给出提示
pub const HIGH_INCIDENCE_WARN_RATIO: f64 = 0.30;

/// 默认每日学习预算（分钟）
pub const DEFAULT_DAILY_BUDGET_MINUTES: i64 = 240;

/// 默认可学习日：周一至周五（0 = 周日）
pub const DEFAULT_VALID_WEEKDAYS: &[u8] = &[1, 2, 3, 4, 5];

/// 默认随机种子
pub const DEFAULT_SEED: u64 = 42;

/// 固定学科占位会话的分组前缀
pub const PINNED_GROUP_PREFIX: &str = "pinned";

/// 偏移窗口天数上限（约十年）
pub const MAX_OFFSET_WINDOW_DAYS: u32 = 3650;

/// 一天的分钟数，题目时长与每日预算的上限
pub const MINUTES_PER_DAY: i64 = 1440;
