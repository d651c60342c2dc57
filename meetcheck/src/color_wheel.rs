//! Display colors for checks that do not pick their own

use meetcheck_common::config::CheckConfig;

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#fd0e35", // tractor red
    "#062a78", // catalina blue
    "#c71585", // medium violet red
    "#00bfff", // deep sky blue
    "#9400d3", // dark violet
    "#138808", // india green
    "#00a693", // persian green
    "#bb6528", // ruddy brown
    "#ff8c00", // dark orange
    "#4b0082", // indigo
];

/// Endless round-robin over a palette, in palette order
#[derive(Debug, Clone)]
pub struct ColorWheel {
    colors: Vec<String>,
    position: usize,
}

impl ColorWheel {
    /// `palette` minus `exclude`; if nothing is left the full palette is used
    pub fn new(palette: &[&str], exclude: &[&str]) -> Self {
        let mut colors: Vec<String> = palette
            .iter()
            .filter(|c| !exclude.iter().any(|e| e.trim().eq_ignore_ascii_case(c)))
            .map(|c| c.to_string())
            .collect();
        if colors.is_empty() {
            colors = palette.iter().map(|c| c.to_string()).collect();
        }
        Self {
            colors,
            position: 0,
        }
    }

    /// Default palette, minus colors that checks already claim explicitly
    pub fn from_checks(checks: &[(String, CheckConfig)]) -> Self {
        let claimed: Vec<&str> = checks
            .iter()
            .filter_map(|(_, check)| check.color.as_deref())
            .collect();
        Self::new(&DEFAULT_PALETTE, &claimed)
    }

    /// The check's own color, or the next one off the wheel
    pub fn color_for(&mut self, check: &CheckConfig) -> String {
        match &check.color {
            Some(color) => color.clone(),
            None => self.next_color(),
        }
    }

    pub fn next_color(&mut self) -> String {
        if self.colors.is_empty() {
            return String::new();
        }
        let color = self.colors[self.position % self.colors.len()].clone();
        self.position = (self.position + 1) % self.colors.len();
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_in_palette_order() {
        let mut wheel = ColorWheel::new(&["#a", "#b", "#c"], &[]);
        let colors: Vec<String> = (0..7).map(|_| wheel.next_color()).collect();
        assert_eq!(colors, vec!["#a", "#b", "#c", "#a", "#b", "#c", "#a"]);
    }

    #[test]
    fn test_excludes_claimed_colors() {
        let mut wheel = ColorWheel::new(&DEFAULT_PALETTE, &["#062A78", "#c71585"]);
        assert_eq!(wheel.next_color(), "#fd0e35");
        assert_eq!(wheel.next_color(), "#00bfff");
    }

    #[test]
    fn test_all_excluded_falls_back_to_palette() {
        let mut wheel = ColorWheel::new(&["#a", "#b"], &["#a", "#b"]);
        assert_eq!(wheel.next_color(), "#a");
    }

    #[test]
    fn test_explicit_color_wins() {
        let explicit = CheckConfig {
            checker: "is_a_relay".to_string(),
            params: toml::Table::new(),
            run: true,
            color: Some("#fd0e35".to_string()),
        };
        let plain = CheckConfig {
            color: None,
            ..explicit.clone()
        };
        let checks = vec![("a".to_string(), explicit.clone()), ("b".to_string(), plain.clone())];

        let mut wheel = ColorWheel::from_checks(&checks);
        assert_eq!(wheel.color_for(&explicit), "#fd0e35");
        assert_eq!(wheel.color_for(&plain), "#062a78");
    }
}
