//! Two-language interface text
//!
//! Every user-visible string exists in Turkish and English. Turkish is the
//! default, matching the upstream tool's audience; the footer button and the
//! tray follow whichever language is active.

use std::str::FromStr;

/// Active interface language
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    Tr,
    En,
}

impl Lang {
    /// Switch to the other language
    pub fn toggled(self) -> Self {
        match self {
            Lang::Tr => Lang::En,
            Lang::En => Lang::Tr,
        }
    }

    /// Translation for `key` in this language
    pub fn text(self, key: TextKey) -> &'static str {
        match self {
            Lang::Tr => turkish(key),
            Lang::En => english(key),
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tr" => Ok(Lang::Tr),
            "en" => Ok(Lang::En),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Keys for every translatable string in the interface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKey {
    WindowTitle,
    Status,
    Connect,
    Disconnect,
    Locations,
    Quit,
    ShowInterface,
    StatusCheck,
    Connected,
    NotConnected,
    Login,
    Logout,
    Username,
    Password,
    LoginButton,
    Cancel,
    ConnectionFailed,
    ConnectionError,
    LoginFailed,
    LoggedOut,
    Connecting,
    Disconnecting,
    VpnConnection,
    NotSignedIn,
    LogoutFailed,
    DisconnectError,
    NotAvailable,
    NoInternet,
    NoInternetMessage,
    ConnectionSuccessful,
    ConnectionFailedTryAgain,
    CheckingConnection,
}

fn turkish(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        WindowTitle => "Hotspot Shield VPN",
        Status => "Durum",
        Connect => "Bağlan",
        Disconnect => "Bağlantıyı Kes",
        Locations => "Konumlar",
        Quit => "Çıkış",
        ShowInterface => "Arayüzü Göster",
        StatusCheck => "Durum Kontrolü",
        Connected => "BAĞLI",
        NotConnected => "BAĞLI DEĞİL",
        Login => "Giriş Yap",
        Logout => "Hesaptan Çıkış",
        Username => "Kullanıcı Adı",
        Password => "Şifre",
        LoginButton => "Giriş",
        Cancel => "İptal",
        ConnectionFailed => "Bağlantı Başarısız",
        ConnectionError => "Bağlantı Hatası",
        LoginFailed => "Giriş Başarısız Oldu",
        LoggedOut => "Çıkış Yapıldı",
        Connecting => "Bağlanılıyor...",
        Disconnecting => "Bağlantı Kesiliyor...",
        VpnConnection => "VPN Bağlantısı",
        NotSignedIn => "Oturum Açılmadı. Giriş Yapılıyor...",
        LogoutFailed => "Çıkış Başarısız Oldu",
        DisconnectError => "Bağlantı Kesme Hatası",
        NotAvailable => "Mevcut Değil",
        NoInternet => "İnternet Bağlantısı Yok",
        NoInternetMessage => {
            "İnternet bağlantısı bulunamadı. Lütfen bağlantınızı kontrol edip tekrar deneyin."
        }
        ConnectionSuccessful => "Bağlantı Başarılı",
        ConnectionFailedTryAgain => "Bağlantı başarısız. Tekrar deneyin.",
        CheckingConnection => "Bağlantı kontrol ediliyor...",
    }
}

fn english(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        WindowTitle => "Hotspot Shield VPN",
        Status => "Status",
        Connect => "Connect",
        Disconnect => "Disconnect",
        Locations => "Locations",
        Quit => "Quit",
        ShowInterface => "Show Interface",
        StatusCheck => "Status Check",
        Connected => "CONNECTED",
        NotConnected => "NOT CONNECTED",
        Login => "Login",
        Logout => "Logout",
        Username => "Username",
        Password => "Password",
        LoginButton => "Login",
        Cancel => "Cancel",
        ConnectionFailed => "Connection Failed",
        ConnectionError => "Connection Error",
        LoginFailed => "Login Failed",
        LoggedOut => "Logged Out",
        Connecting => "Connecting...",
        Disconnecting => "Disconnecting...",
        VpnConnection => "VPN Connection",
        NotSignedIn => "Not Signed In. Logging In...",
        LogoutFailed => "Logout Failed",
        DisconnectError => "Disconnect Error",
        NotAvailable => "Not Available",
        NoInternet => "No Internet Connection",
        NoInternetMessage => {
            "No internet connection found. Please check your connection and try again."
        }
        ConnectionSuccessful => "Connection Successful",
        ConnectionFailedTryAgain => "Connection failed. Please try again.",
        CheckingConnection => "Checking connection...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(Lang::Tr.toggled(), Lang::En);
        assert_eq!(Lang::En.toggled().toggled(), Lang::En);
    }

    #[test]
    fn test_default_language_is_turkish() {
        assert_eq!(Lang::default(), Lang::Tr);
        assert_eq!(Lang::default().text(TextKey::Connect), "Bağlan");
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("en".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!("TR".parse::<Lang>().unwrap(), Lang::Tr);
        assert!("de".parse::<Lang>().is_err());
    }

    #[test]
    fn test_both_languages_cover_every_key() {
        use TextKey::*;
        let keys = [
            WindowTitle,
            Status,
            Connect,
            Disconnect,
            Locations,
            Quit,
            ShowInterface,
            StatusCheck,
            Connected,
            NotConnected,
            Login,
            Logout,
            Username,
            Password,
            LoginButton,
            Cancel,
            ConnectionFailed,
            ConnectionError,
            LoginFailed,
            LoggedOut,
            Connecting,
            Disconnecting,
            VpnConnection,
            NotSignedIn,
            LogoutFailed,
            DisconnectError,
            NotAvailable,
            NoInternet,
            NoInternetMessage,
            ConnectionSuccessful,
            ConnectionFailedTryAgain,
            CheckingConnection,
        ];
        for key in keys {
            assert!(!Lang::Tr.text(key).is_empty());
            assert!(!Lang::En.text(key).is_empty());
        }
    }
}
