#[derive(Debug, Clone)]
pub struct ParseConfig {
    pub app_name: String,
    pub group_name: String,
    pub max_tokens: usize,
    pub validate_values: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            app_name: "ACAD".to_string(),
            group_name: "DSTYLE".to_string(),
            max_tokens: 4096,
            validate_values: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub strict: bool,
    pub app_name: String,
    pub group_name: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            strict: false,
            app_name: "ACAD".to_string(),
            group_name: "DSTYLE".to_string(),
        }
    }
}
