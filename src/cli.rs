use clap::{Parser, Subcommand};
use idcard_common::endpoints::DownloadKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "idcard")]
#[command(
    about = "ID card registration client (NIK lookup, photo, bulk upload)",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// フォームと同じ入力項目
#[derive(clap::Args, Debug, Default, Clone)]
pub struct RecordArgs {
    /// 氏名
    #[arg(long)]
    pub name: Option<String>,

    /// 電話番号
    #[arg(long)]
    pub phone: Option<String>,

    /// 住所
    #[arg(long)]
    pub address: Option<String>,

    /// 評価
    #[arg(long)]
    pub rating: Option<String>,

    /// 備考
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// NIKで登録済みレコードを検索
    Lookup {
        /// NIK
        #[arg(required = true)]
        nik: String,

        /// 登録済み写真をPNGで保存
        #[arg(long)]
        photo_out: Option<PathBuf>,
    },

    /// ステータスに対応する新しいIDを取得
    NewId {
        /// ステータスコード（V = Vendor、それ以外は Penyetor）
        #[arg(short, long, default_value = "S")]
        status: String,
    },

    /// 登録フォームを送信（既存NIKなら更新）
    Register {
        /// NIK
        #[arg(long, required = true)]
        nik: String,

        /// ステータスコード
        #[arg(short, long, default_value = "S")]
        status: String,

        /// カメラの代わりに使う写真ファイル
        #[arg(long)]
        photo: Option<PathBuf>,

        #[command(flatten)]
        record: RecordArgs,

        /// 送信せずに送信内容を表示
        #[arg(long)]
        dry_run: bool,
    },

    /// スプレッドシートを一括アップロード
    Upload {
        /// .xlsx ファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 不完全な行があっても送信
        #[arg(long)]
        force: bool,
    },

    /// 一括アップロード用の空テンプレートを作成
    Template {
        /// 出力ファイル
        #[arg(default_value = "users.xlsx")]
        output: PathBuf,
    },

    /// IDカード・契約書をダウンロード
    Download {
        /// 利用者ID
        #[arg(long, required = true)]
        uid: String,

        /// 種別 (card/contract)
        #[arg(short = 't', long = "type", default_value = "card")]
        kind: DownloadKind,

        /// 出力ファイル（デフォルト: <uid>.png / <uid>.pdf）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 接続先URLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 写真の取得元URLを設定
        #[arg(long)]
        set_photo_base: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
