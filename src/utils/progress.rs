use std::io::Write;

/// 單行進度輸出，原地覆寫
pub struct ProgressLine {
    total: usize,
    last_len: usize,
}

impl ProgressLine {
    pub fn new(total: usize) -> Self {
        Self { total, last_len: 0 }
    }

    pub fn update(&mut self, current: usize, label: &str) {
        let line = format!("⏳ [{}/{}] {}", current, self.total, label);
        // 用空白蓋掉上一行較長的殘留
        let padding = self.last_len.saturating_sub(line.chars().count());
        print!("\r{}{}", line, " ".repeat(padding));
        let _ = std::io::stdout().flush();
        self.last_len = line.chars().count();
    }

    pub fn finish(&mut self) {
        if self.last_len > 0 {
            println!();
            self.last_len = 0;
        }
    }
}
