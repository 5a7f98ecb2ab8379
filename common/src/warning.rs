//! 警告表示エリア
//!
//! 画面上のエラー表示は一か所だけ。新しい警告は前の警告を置き換える。

/// 警告メッセージの先頭に付ける記号
pub const WARNING_GLYPH: &str = "⚠️";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningSurface {
    message: Option<String>,
}

impl WarningSurface {
    pub fn show_warning(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// サーバーのエラー文字列を記号付きで表示する
    pub fn show_domain_error(&mut self, error: &str) {
        self.show_warning(format!("{} {}", WARNING_GLYPH, error));
    }

    pub fn clear_warning(&mut self) {
        self.message = None;
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_hidden() {
        let surface = WarningSurface::default();
        assert!(!surface.is_visible());
        assert_eq!(surface.message(), None);
    }

    #[test]
    fn test_new_warning_replaces_previous() {
        let mut surface = WarningSurface::default();
        surface.show_warning("first");
        surface.show_warning("second");
        assert_eq!(surface.message(), Some("second"));
    }

    #[test]
    fn test_domain_error_glyph() {
        let mut surface = WarningSurface::default();
        surface.show_domain_error("NIK not found");
        assert_eq!(surface.message(), Some("⚠️ NIK not found"));
    }

    #[test]
    fn test_clear_hides() {
        let mut surface = WarningSurface::default();
        surface.show_warning("x");
        surface.clear_warning();
        assert!(!surface.is_visible());
    }
}
