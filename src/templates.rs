use crate::config::DeployInfo;
use handlebars::Handlebars;
use serde::Serialize;

const INDEX_TEMPLATE: &str = include_str!("templates/index.hbs");
const AI_TEST_TEMPLATE: &str = include_str!("templates/ai_test.hbs");

/// 页面模板集合，启动时注册，渲染时按名称取用
pub struct Templates {
    handlebars: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string("index.hbs", INDEX_TEMPLATE)
            .expect("注册首页模板失败");
        handlebars
            .register_template_string("ai_test.hbs", AI_TEST_TEMPLATE)
            .expect("注册 AI 测试页模板失败");

        Self { handlebars }
    }

    /// 按名称渲染模板
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> crate::Result<String> {
        Ok(self.handlebars.render(template_name, data)?)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

/// 首页数据
#[derive(Serialize)]
pub struct IndexPage<'a> {
    #[serde(flatten)]
    pub deploy: &'a DeployInfo,
    pub provider: &'a str,
    pub model: &'a str,
    pub configured: bool,
}

impl IndexPage<'_> {
    pub fn render(&self, templates: &Templates) -> crate::Result<String> {
        templates.render("index.hbs", self)
    }
}

/// AI 测试页数据，answer 与 warning 至多一个有值
#[derive(Serialize)]
pub struct AiTestPage<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub answer: Option<String>,
    pub warning: Option<String>,
}

impl AiTestPage<'_> {
    pub fn render(&self, templates: &Templates) -> crate::Result<String> {
        templates.render("ai_test.hbs", self)
    }
}
