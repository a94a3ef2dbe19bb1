//! 界面文案
//!
//! 泰语为默认语言，另附英文

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Th,
    En,
}

/// 一套界面字符串
#[derive(Debug)]
pub struct Strings {
    pub app_title: &'static str,
    pub category: &'static str,
    pub random: &'static str,
    pub randomizing: &'static str,
    pub copy: &'static str,
    pub copied: &'static str,
    pub more: &'static str,
    pub more_title: &'static str,
    pub source_prefix: &'static str,
    pub reference_prefix: &'static str,
    pub error: &'static str,
    pub loading: &'static str,
    pub switch_to_light: &'static str,
    pub switch_to_dark: &'static str,
    pub quit: &'static str,
    pub close: &'static str,
    pub clipboard_failed: &'static str,
}

static TH: Strings = Strings {
    app_title: "คำคมประจำวัน",
    category: "หมวดหมู่",
    random: "สุ่มคำคม",
    randomizing: "กำลังสุ่ม...",
    copy: "คัดลอก",
    copied: "คัดลอกแล้ว ✓",
    more: "ข้อมูลเพิ่มเติม",
    more_title: "ข้อมูลเพิ่มเติม",
    source_prefix: "ที่มา:",
    reference_prefix: "อ้างอิง:",
    error: "มีบางอย่างผิดพลาด ลองอีกครั้งนะ",
    loading: "กำลังโหลด...",
    switch_to_light: "สลับเป็นโหมดสว่าง",
    switch_to_dark: "สลับเป็นโหมดมืด",
    quit: "ออก",
    close: "ปิด",
    clipboard_failed: "คัดลอกไม่สำเร็จ",
};

static EN: Strings = Strings {
    app_title: "Daily Quote",
    category: "Category",
    random: "Random quote",
    randomizing: "Picking...",
    copy: "Copy",
    copied: "Copied ✓",
    more: "More info",
    more_title: "More info",
    source_prefix: "Source:",
    reference_prefix: "Reference:",
    error: "Something went wrong, please try again",
    loading: "Loading...",
    switch_to_light: "Switch to light mode",
    switch_to_dark: "Switch to dark mode",
    quit: "Quit",
    close: "Close",
    clipboard_failed: "Copy failed",
};

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::Th => &TH,
            Locale::En => &EN,
        }
    }

    /// 切换分类时的占位文字
    pub fn category_placeholder(self, category: &str) -> String {
        format!("{}: {}", self.strings().category, category)
    }
}
