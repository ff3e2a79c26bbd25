/// Glyph painted for an icon name. Names follow the Material Symbols set
/// the AI service suggests from; unknown names get a generic sparkle.
pub fn glyph_for(name: &str) -> &'static str {
    match name.trim().to_ascii_lowercase().as_str() {
        "rocket" | "rocket_launch" => "🚀",
        "star" | "star_rate" | "grade" => "⭐",
        "lightbulb" | "tips_and_updates" | "emoji_objects" => "💡",
        "favorite" | "heart" | "favorite_border" => "❤",
        "check" | "check_circle" | "done" | "task_alt" => "✅",
        "bolt" | "flash_on" | "electric_bolt" => "⚡",
        "trending_up" | "show_chart" | "insights" => "📈",
        "trending_down" => "📉",
        "bar_chart" | "analytics" | "leaderboard" => "📊",
        "payments" | "attach_money" | "savings" | "monetization_on" => "💰",
        "groups" | "group" | "people" | "diversity_3" => "👥",
        "person" | "account_circle" => "👤",
        "psychology" | "neurology" => "🧠",
        "school" | "menu_book" | "book" | "auto_stories" => "📚",
        "schedule" | "timer" | "alarm" | "hourglass_empty" => "⏰",
        "public" | "language" | "travel_explore" => "🌍",
        "lock" | "security" | "shield" | "verified_user" => "🔒",
        "mail" | "email" | "send" => "✉",
        "chat" | "forum" | "chat_bubble" | "sms" => "💬",
        "campaign" | "mic" | "record_voice_over" => "📣",
        "target" | "track_changes" | "ads_click" => "🎯",
        "trophy" | "emoji_events" | "military_tech" => "🏆",
        "eco" | "park" | "spa" => "🌿",
        "local_fire_department" | "whatshot" => "🔥",
        "thumb_up" | "recommend" => "👍",
        "handshake" => "🤝",
        "celebration" | "auto_awesome" => "✨",
        "work" | "business_center" => "💼",
        "code" | "terminal" | "developer_mode" => "💻",
        "smartphone" | "phone_iphone" => "📱",
        "cloud" => "☁",
        "home" => "🏠",
        "search" => "🔍",
        "settings" | "build" | "construction" => "🔧",
        "warning" | "error" => "⚠",
        "info" | "help" => "ℹ",
        "sunny" | "light_mode" => "☀",
        "dark_mode" | "bedtime" => "🌙",
        "music_note" | "headphones" => "🎵",
        "photo_camera" | "image" | "photo" => "📷",
        "restaurant" | "local_cafe" => "☕",
        "fitness_center" | "sports_gymnastics" => "💪",
        "flag" => "🚩",
        "arrow_forward" | "east" => "➜",
        "diamond" => "💎",
        "key" | "vpn_key" => "🔑",
        "calendar_month" | "event" | "calendar_today" => "📅",
        "edit" | "draw" | "brush" => "✏",
        "visibility" => "👁",
        "sell" | "shopping_cart" | "storefront" => "🛒",
        _ => "✦",
    }
}
