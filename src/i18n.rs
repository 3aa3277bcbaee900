//! # 本地化消息模块
//!
//! 面向用户的状态提示按语言存放在静态表中，运行时只需选择一次语言。

use clap::ValueEnum;

/// 状态提示使用的语言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    #[value(name = "en")]
    English,
    #[value(name = "am")]
    Amharic,
}

/// 一种语言下的全部状态提示。
#[derive(Debug)]
pub struct Messages {
    pub processing_hide: &'static str,
    pub processing_reveal: &'static str,
    pub hide_complete: &'static str,
    pub reveal_complete: &'static str,
    pub hidden_message: &'static str,
    pub no_message_found: &'static str,
    pub error: &'static str,
    pub saved: &'static str,
    pub usable_bits: &'static str,
    pub reserved_for_terminator: &'static str,
    pub max_characters: &'static str,
}

static ENGLISH: Messages = Messages {
    processing_hide: "Hiding message in image...",
    processing_reveal: "Revealing hidden message...",
    hide_complete: "Message hidden successfully!",
    reveal_complete: "Message revealed successfully!",
    hidden_message: "Hidden Message:",
    no_message_found: "No hidden message found in image",
    error: "Error processing image",
    saved: "Stego image saved successfully!",
    usable_bits: "Usable bits:",
    reserved_for_terminator: "reserved for the terminator",
    max_characters: "Maximum characters:",
};

static AMHARIC: Messages = Messages {
    processing_hide: "መልእክት በምስል ውስጥ በመደበቅ ላይ...",
    processing_reveal: "የተደበቀ መልእክት በማውጣት ላይ...",
    hide_complete: "መልእክት በተሳካ ሁኔታ ተደብቋል!",
    reveal_complete: "መልእክት በተሳካ ሁኔታ ተገልጧል!",
    hidden_message: "የተደበቀ መልእክት:",
    no_message_found: "በምስል ውስጥ ምንም የተደበቀ መልእክት አልተገኘም",
    error: "ምስል በማስኬድ ላይ ስህተት",
    saved: "ስውር ምስል በተሳካ ሁኔታ ተቀምጧል!",
    usable_bits: "ጥቅም ላይ የሚውሉ ቢቶች:",
    reserved_for_terminator: "ለመጨረሻ ምልክት የተያዙ",
    max_characters: "ከፍተኛ የፊደላት ብዛት:",
};

impl Language {
    pub fn messages(self) -> &'static Messages {
        match self {
            Language::English => &ENGLISH,
            Language::Amharic => &AMHARIC,
        }
    }
}
