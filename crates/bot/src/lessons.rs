//! Static learning-guide content served by `/learn` and its inline menu.

pub const MENU_TEXT: &str =
    "📚 Welcome to the Trading Learning Guide!\n\nSelect a topic below to start learning step-by-step:";

pub fn menu_markup() -> serde_json::Value {
    serde_json::json!({
        "inline_keyboard": [
            [{ "text": "📘 Trading Basics", "callback_data": "lesson_basics" }],
            [{ "text": "📝 Terminology", "callback_data": "lesson_terms" }],
            [{ "text": "💡 Tips & Strategies", "callback_data": "lesson_tips" }],
            [{ "text": "🔗 Resources", "callback_data": "lesson_resources" }],
        ]
    })
}

pub fn lesson_text(data: &str) -> &'static str {
    match data {
        "lesson_basics" => {
            "📘 Trading Basics\n\n\
            Trading is the act of buying and selling financial instruments like stocks, crypto, or forex to make a profit.\n\n\
            Markets:\n\
            🔹 Stocks – shares of companies\n\
            🔹 Crypto – digital currencies like Bitcoin or Ethereum\n\
            🔹 Forex – foreign exchange currency pairs\n\n\
            How it works:\n\
            1️⃣ Buy low, sell high\n\
            2️⃣ Use analysis (technical/fundamental)\n\
            3️⃣ Manage risk with stop-losses"
        }
        "lesson_terms" => {
            "📝 Key Trading Terms\n\n\
            📈 Bull Market – prices are rising\n\
            📉 Bear Market – prices are falling\n\
            💹 Leverage – borrowing money to increase position size\n\
            ⛔ Stop-Loss – automatically sell to limit losses\n\
            📊 Candlestick – chart showing price movement\n\
            💱 Spread – difference between buy and sell price\n\
            🔄 Volatility – measure of price fluctuations"
        }
        "lesson_tips" => {
            "💡 Tips & Strategies\n\n\
            ✅ Start with a demo account to practice\n\
            ✅ Diversify your investments\n\
            ✅ Stick to your risk management plan\n\
            ✅ Keep emotions out of trading decisions\n\
            ✅ Learn to read charts and indicators\n\
            ✅ Track news and market trends"
        }
        "lesson_resources" => {
            "🔗 Resources & Learning\n\n\
            📚 Books: 'Trading for Dummies', 'The Intelligent Investor'\n\
            🌐 Websites: Investopedia, TradingView, CoinMarketCap\n\
            🎥 YouTube channels: Trading tutorials, market analysis\n\
            💬 Join our private chat groups for tips and daily discussions!"
        }
        _ => "❌ Unknown lesson. Please try again.",
    }
}
