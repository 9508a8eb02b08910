//! User-facing reservation messages.

use super::{BookingAvailability, ReservationDetails};
use crate::domain::search::RestaurantCandidate;

pub const SESSION_NOT_FOUND: &str = "セッションが見つかりません。新しい予約を開始してください。";

pub const SESSION_CLOSED: &str = "予約セッションをキャンセルしました";

pub const CONFLICT: &str = "前のリクエストを処理中です。少し待ってからもう一度お試しください。";

const FORM_EXAMPLE: &str = "日時: 2025-12-24 19:00, 人数: 2名, 名前: 山田太郎, 電話: 090-1234-5678, メール: taro@example.com, 要望: なし";

fn or_unknown(value: &str, fallback: &'static str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

pub fn start(restaurant: &RestaurantCandidate) -> String {
    format!(
        "🍽️ **{}** の予約を開始します！\n\n📍 住所: {}\n📞 電話: {}\n\n📅 まず、いつ予約したいですか？\n日時を教えてください。\n例: 「明日の19時」「今週土曜日の12時」「12月25日の18時30分」",
        or_unknown(&restaurant.name, "レストラン"),
        or_unknown(restaurant.display_address(), "住所不明"),
        restaurant.phone_number.as_deref().unwrap_or("電話番号なし"),
    )
}

pub fn unavailable(restaurant: &RestaurantCandidate, availability: &BookingAvailability) -> String {
    let mut message = format!(
        "⚠️ **{}は現在、オンラインAI予約に対応していません**\n\n理由: {}\n\n",
        or_unknown(&restaurant.name, "このレストラン"),
        availability.description
    );
    if let Some(phone) = &availability.phone_number {
        message.push_str(&format!("📞 **直接お電話での予約をお勧めします**: {}\n\n", phone));
    }
    if !availability.alternative_methods.is_empty() {
        message.push_str("🔄 **代替予約方法**:\n");
        for method in &availability.alternative_methods {
            message.push_str(&format!("• {}\n", method));
        }
    }
    message
}

pub fn form_guide() -> String {
    format!(
        "以下の形式でまとめて入力してください:\n{}\n\n文章で「12月24日19時に2名、山田太郎、090-1234-5678、taro@example.com」のように入力することもできます。",
        FORM_EXAMPLE
    )
}

pub fn quick_pick_set(label: &str, missing: &[&str]) -> String {
    format!(
        "📅 「{}」で承りました。\n\n続けて、次の情報を入力してください: {}\n\n{}",
        label,
        missing.join(", "),
        form_guide()
    )
}

pub fn still_missing(missing: &[&str]) -> String {
    format!(
        "ありがとうございます！\n続けて、次の情報を入力してください: {}",
        missing.join(", ")
    )
}

pub fn form_missing(missing: &[&str]) -> String {
    format!(
        "以下の情報が不足しています: {}\nもう一度入力してください。",
        missing.join(", ")
    )
}

pub fn invalid_fields(problems: &[String]) -> String {
    let mut message = "入力内容に誤りがあります:\n".to_string();
    for problem in problems {
        message.push_str(&format!("• {}\n", problem));
    }
    message.push_str("もう一度入力してください。");
    message
}

pub fn details_not_understood() -> String {
    format!(
        "申し訳ございません。入力内容を理解できませんでした。\n{}",
        form_guide()
    )
}

pub fn back_to_confirm_incomplete(missing: &[&str]) -> String {
    format!(
        "確認画面に戻る前に、次の情報を入力してください: {}",
        missing.join(", ")
    )
}

fn summary_lines(restaurant: &RestaurantCandidate, details: &ReservationDetails) -> String {
    format!(
        "🏪 **レストラン**: {}\n📍 **住所**: {}\n📅 **日時**: {}\n👥 **人数**: {}名\n📝 **お名前**: {}\n📱 **電話番号**: {}\n📧 **メール**: {}\n💭 **特別要望**: {}",
        or_unknown(&restaurant.name, "不明"),
        or_unknown(restaurant.display_address(), "不明"),
        details.formatted_datetime(),
        details.party_size,
        details.name,
        details.phone,
        details.email,
        details.special_requests_text(),
    )
}

pub fn confirmation(restaurant: &RestaurantCandidate, details: &ReservationDetails) -> String {
    format!(
        "🎯 **予約内容の確認**\n\n{}\n\nこの内容で予約を取りますか？\n📞 予約完了後、必要に応じてレストランにお電話で確認することをお勧めします。",
        summary_lines(restaurant, details)
    )
}

pub fn confirm_not_understood() -> &'static str {
    "申し訳ございません。入力を理解できませんでした。\n「予約を実行する」「修正する」「キャンセル」のいずれかを選んでください。"
}

pub fn edit(details: &ReservationDetails) -> String {
    format!(
        "📝 修正したい項目を入力してください。\n変更する項目だけで構いません（例: 「人数: 4名」「電話: 090-1234-5678」）。\n\n現在の内容:\n日時: {}\n人数: {}名\n名前: {}\n電話: {}\nメール: {}\n要望: {}",
        details.formatted_datetime(),
        details.party_size,
        details.name,
        details.phone,
        details.email,
        details.special_requests_text(),
    )
}

pub fn completed(
    restaurant: &RestaurantCandidate,
    details: &ReservationDetails,
    reservation_id: &str,
) -> String {
    format!(
        "🎉 **予約リクエストを受け付けました！**\n\n📋 **予約番号**: {id}\n{summary}\n\n📞 **レストラン連絡先**: {phone}\n\n💡 **ご来店の際のお願い**:\n• 予約時間の5-10分前にお越しください\n• 遅刻やキャンセルの場合は事前にレストランにご連絡ください\n• 予約番号をお控えください: **{id}**\n\n※ 店舗からの確定連絡をもって予約成立となります。\n🍽️ 素敵なお食事をお楽しみください！",
        id = reservation_id,
        summary = summary_lines(restaurant, details),
        phone = restaurant
            .phone_number
            .as_deref()
            .unwrap_or("店舗にお問い合わせください"),
    )
}

pub fn cancelled() -> &'static str {
    "❌ 予約をキャンセルしました。\nまた機会がございましたらお気軽にお声がけください。"
}

pub fn too_many_failures() -> &'static str {
    "入力エラーが続いたため、予約を中断しました。お手数ですが、最初から予約をやり直してください。"
}
