//! User-facing reply texts, in the bot's voice.

/// Second trigger while the previous one is still being answered.
pub const STILL_THINKING: &str = "Погоди, брат, я ещё над прошлым думаю. Не торопи Магу.";

/// Trigger prefix with nothing after it.
pub const EMPTY_QUESTION: &str = "Ну и? Обратился, а вопрос где? Пиши после 'Мага,'.";

/// Storage or other internal failure.
pub const GENERIC_FAILURE: &str = "Что-то сломалось. Не ной, пиши заново.";

/// Paid, but the payload could not be applied.
pub const SETTLEMENT_FAILED: &str =
    "Оплата дошла, но я не понял, за кого. Напиши админу, разберёмся.";

/// Admin commands from anyone else.
pub const GRANT_FORBIDDEN: &str = "Эй, не тронь чужое. Только админ раздаёт.";
/// `/grant` usage.
pub const GRANT_USAGE: &str = "Формат: /grant <user_id> <days>. Не тупи, братан.";
/// `/grant` with non-numeric arguments.
pub const GRANT_NOT_NUMBERS: &str = "user_id и days — числа, не буквы. Попробуй заново.";
/// `/grant` with a non-positive period.
pub const GRANT_DAYS_POSITIVE: &str = "Дней >0, лентяй. Не минусуй доступ.";
/// `/grant_group` usage.
pub const GRANT_GROUP_USAGE: &str = "Формат: /grant_group <chat_id> <days>. Чётко, брат.";
/// `/grant_group` with non-numeric arguments.
pub const GRANT_GROUP_NOT_NUMBERS: &str = "chat_id и days — цифры, не иероглифы.";
/// `/grant_group` with a non-positive period.
pub const GRANT_GROUP_DAYS_POSITIVE: &str = "Дней положительно, не в минус.";

/// Invoice title.
pub const INVOICE_TITLE: &str = "Доступ к МагаБоту";
/// Invoice price label.
pub const INVOICE_LABEL: &str = "Доступ";

pub fn start_group(prefix: &str) -> String {
    format!(
        "Эй, банда! Я Мага. Зовите '{}' — отвечу, если группа заплатила. /pay — один платит за всех. /status — чек.",
        prefix
    )
}

pub fn start_private(prefix: &str, access_days: i64) -> String {
    format!(
        "Эй, братан! Я Мага. Пиши '{}' — отвечу в ЛС (плати /pay за {} дней). /status — чек.",
        prefix, access_days
    )
}

/// Group never paid.
pub fn group_never_paid(amount: i64, access_days: i64) -> String {
    format!(
        "Группа не платит! /pay — {} звёзд за {} дней всем. Один герой — все в теме.",
        amount, access_days
    )
}

/// Group access ran out.
pub const GROUP_LAPSED: &str = "В группе срок кончился. Платите /pay заново, лентяи.";

/// User never paid.
pub fn private_never_paid(access_days: i64) -> String {
    format!("В ЛС плати сам! /pay — {} дней моих советов.", access_days)
}

/// User access ran out.
pub const PRIVATE_LAPSED: &str = "Твой срок кончился. /pay заново — и снова болтаем.";

/// `/status` reply for a group.
pub fn group_status(days: i64, entitled: bool) -> String {
    match days {
        d if d > 0 => format!("Группа в теме: {} дней. Болтайте все!", d),
        0 if entitled => "Группа в теме, но меньше дня осталось. /pay — продлить.".to_string(),
        0 => "В группе срок кончился. Платите заново, лентяи. /pay".to_string(),
        _ => "Группа не платит. /pay — и все счастливы.".to_string(),
    }
}

/// `/status` reply in a private chat.
pub fn private_status(days: i64, entitled: bool) -> String {
    match days {
        d if d > 0 => format!("Твой доступ: {} дней. Не трать зря!", d),
        0 if entitled => "Меньше дня осталось, брат. /pay — продлить.".to_string(),
        0 => "Твой срок кончился. /pay заново.".to_string(),
        _ => "Ты не платил. /pay — вперёд.".to_string(),
    }
}

pub fn invoice_description_group(amount: i64, access_days: i64) -> String {
    format!(
        "{} Stars — и {} дней для всей группы. Один платит — все в теме.",
        amount, access_days
    )
}

pub fn invoice_description_private(amount: i64, access_days: i64) -> String {
    format!("{} Stars — и {} дней болтовни в ЛС. Не жмись.", amount, access_days)
}

pub fn pay_nudge_group(amount: i64) -> String {
    format!(
        "Плати за группу, герой. {} звёзд — и все зовут меня. Или сиди в углу.",
        amount
    )
}

pub fn pay_nudge_private(amount: i64, access_days: i64) -> String {
    format!(
        "Плати {} звёзд за {} дней в ЛС. Или молчи, как рыба.",
        amount, access_days
    )
}

pub fn settled_group(access_days: i64) -> String {
    format!(
        "Группа оплачена! {} дней всем. Зовите меня, не стесняйтесь.",
        access_days
    )
}

pub fn settled_private(access_days: i64) -> String {
    format!("Твой доступ: {} дней. Болтай в ЛС.", access_days)
}

pub fn granted_user(user_id: i64, days: i64) -> String {
    format!("Доступ юзеру {}: {} дней. Раздал, как царь.", user_id, days)
}

pub fn granted_group(chat_id: i64, days: i64) -> String {
    format!("Группа {}: {} дней. Все в теме теперь.", chat_id, days)
}
