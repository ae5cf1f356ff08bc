//! ReAct模式的配置与响应

/// ReAct循环配置
#[derive(Debug, Clone)]
pub struct ReActConfig {
    /// 最大迭代次数
    pub max_iterations: usize,
    /// 是否输出过程日志
    pub verbose: bool,
    /// 达到最大迭代次数时是否返回已获得的部分结果
    pub return_partial_on_max_depth: bool,
}

impl Default for ReActConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            verbose: false,
            return_partial_on_max_depth: true,
        }
    }
}

impl ReActConfig {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Default::default()
        }
    }
}

/// ReAct循环的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ReActResponse {
    pub content: String,
    pub iterations_used: usize,
    pub stopped_by_max_depth: bool,
    /// `name(arguments)` 形式的工具调用记录
    pub tool_calls_history: Vec<String>,
}

impl ReActResponse {
    pub fn success(content: String, iterations_used: usize) -> Self {
        Self {
            content,
            iterations_used,
            stopped_by_max_depth: false,
            tool_calls_history: Vec::new(),
        }
    }

    pub fn max_depth_reached(
        content: String,
        max_depth: usize,
        tool_calls_history: Vec<String>,
    ) -> Self {
        Self {
            content,
            iterations_used: max_depth,
            stopped_by_max_depth: true,
            tool_calls_history,
        }
    }
}
