//! The built-in whisper gallery seeded into an empty store.

use givre_shared::Essence;

use crate::records::SnowflakeRecord;

const HOUR_MS: i64 = 3_600_000;

/// Fixed gallery shown before the user crystallizes anything.
const PRESET_WHISPERS: [(&str, Essence); 51] = [
    ("在我们第一次看到星星的地方见面", Essence::Aurora),
    ("Meet me where we first saw the stars", Essence::Stardust),
    ("时间冻结的瞬间，像掌心的雪花", Essence::Aurora),
    ("月光洒在你的发梢，我想留住这一刻", Essence::Stardust),
    ("Every snowflake is a kiss from heaven", Essence::Aurora),
    ("你的笑容，是我见过最美的风景", Essence::Stardust),
    ("如果可以，我想把这一刻定格成永恒", Essence::Aurora),
    ("In your eyes, I found my universe", Essence::Stardust),
    ("世上没有两片相同的雪花，也没有两个相同的灵魂", Essence::Stardust),
    ("来自虚空的低语，在时间中结晶", Essence::Aurora),
    ("In the silence between heartbeats, I found eternity", Essence::Stardust),
    ("所有的相遇都是久别重逢", Essence::Aurora),
    ("时间是最温柔的刀，雕刻着我们的故事", Essence::Stardust),
    ("We are all stardust, temporarily gathered", Essence::Aurora),
    ("愿你的每一天都像雪花一样独特而美丽", Essence::Stardust),
    ("May your dreams crystallize into reality", Essence::Aurora),
    ("在最寒冷的冬天，也要保持心中的温暖", Essence::Stardust),
    ("愿所有美好如期而至，愿所有温柔都被善待", Essence::Aurora),
    ("May the stars guide you home", Essence::Stardust),
    ("午夜的钟声响起时，我会在老地方等你", Essence::Aurora),
    ("The secret garden blooms only for those who believe", Essence::Stardust),
    ("北极光下的誓言，永不褪色", Essence::Aurora),
    ("在星空下许下的愿望，总会实现", Essence::Stardust),
    ("Where the moonlight meets the ocean, our story begins", Essence::Aurora),
    ("樱花落下的速度是每秒五厘米，我想你的速度是每秒一万次", Essence::Stardust),
    ("如果云知道，它会带走我所有的思念", Essence::Aurora),
    ("Between the pages of time, I found your smile", Essence::Stardust),
    ("风吹过的地方，都是你的温柔", Essence::Aurora),
    ("The universe whispered your name to me", Essence::Stardust),
    ("即使融化，也要绽放最美的光芒", Essence::Aurora),
    ("Every ending is a new beginning in disguise", Essence::Stardust),
    ("黎明前的黑暗，是为了迎接更灿烂的光", Essence::Aurora),
    ("You are braver than you believe", Essence::Stardust),
    ("每一次跌倒，都是为了更好地站起来", Essence::Aurora),
    ("当第七颗星星升起时，秘密将被揭晓", Essence::Aurora),
    ("The key is hidden where the moonlight touches the water", Essence::Stardust),
    ("三个字，藏在这片雪花的第七个分支里", Essence::Aurora),
    ("Follow the northern lights to find the truth", Essence::Stardust),
    ("答案就在你最初的选择里", Essence::Aurora),
    ("2026.01.18 - 一切改变的那一天", Essence::Stardust),
    ("这是我们的第1000天，也是新的开始", Essence::Aurora),
    ("2026年的第一场雪，见证了我们的约定", Essence::Stardust),
    ("The day we met, the universe smiled", Essence::Aurora),
    ("春天的第一朵花，为你而开", Essence::Stardust),
    ("夏夜的萤火虫，带着我的思念飞向你", Essence::Aurora),
    ("秋天的落叶，写满了我想说的话", Essence::Stardust),
    ("冬日的暖阳，是你给我的温柔", Essence::Aurora),
    ("The ocean remembers every wave, as I remember you", Essence::Stardust),
    ("你的名字，是我听过最美的旋律", Essence::Aurora),
    ("Life is a symphony, and you are my favorite note", Essence::Stardust),
    ("在音乐停止的地方，我们的故事开始", Essence::Aurora),
];

/// Build the preset records, staggered one hour apart so the newest preset
/// sits one hour before `now_ms` and never outranks fresh user records.
pub(crate) fn preset_records(now_ms: i64) -> Vec<SnowflakeRecord> {
    let base = now_ms - PRESET_WHISPERS.len() as i64 * HOUR_MS;
    PRESET_WHISPERS
        .iter()
        .enumerate()
        .map(|(index, &(message, essence))| SnowflakeRecord {
            id: format!("preset_{index}"),
            message: message.to_owned(),
            encrypted_message: None,
            has_password: false,
            timestamp: base + index as i64 * HOUR_MS,
            essence,
        })
        .collect()
}
