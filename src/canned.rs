//! Hard-coded answers used when neither the knowledge base nor the remote
//! completion service produced anything.
//!
//! Each locale has an ordered rule table; the first rule with a trigger
//! contained in the lowercased query wins, otherwise the locale's generic
//! "here is what I can answer" text is used.

use crate::locale::Locale;

/// How a rule produces its text
#[derive(Debug)]
pub enum Template {
    Text(&'static str),
    /// Salutation picked from the query, followed by a fixed body
    Greeting {
        salutations: &'static [(&'static str, &'static str)],
        default: &'static str,
        body: &'static str,
    },
}

#[derive(Debug)]
pub struct CannedRule {
    pub topic: &'static str,
    pub triggers: &'static [&'static str],
    pub template: Template,
}

impl CannedRule {
    pub fn matches(&self, query: &str) -> bool {
        self.triggers.iter().any(|t| query.contains(t))
    }

    fn render(&self, query: &str) -> String {
        match &self.template {
            Template::Text(text) => (*text).to_string(),
            Template::Greeting {
                salutations,
                default,
                body,
            } => {
                let salutation = salutations
                    .iter()
                    .find(|(trigger, _)| query.contains(trigger))
                    .map(|(_, salutation)| *salutation)
                    .unwrap_or(*default);
                format!("{}! {}", salutation, body)
            }
        }
    }
}

/// Rules and generic answer of one locale
#[derive(Debug)]
pub struct CannedTable {
    pub rules: &'static [CannedRule],
    pub generic: &'static str,
}

/// Rule table for a locale
pub fn table(locale: Locale) -> &'static CannedTable {
    match locale {
        Locale::Pt => &PT,
        Locale::En => &EN,
        Locale::Es => &ES,
    }
}

/// First matching rule for `query`, if any
pub fn matching_rule(query: &str, locale: Locale) -> Option<&'static CannedRule> {
    let query = query.to_lowercase();
    table(locale).rules.iter().find(|rule| rule.matches(&query))
}

/// Canned answer for `query` in `locale`
pub fn respond(query: &str, locale: Locale) -> String {
    match matching_rule(query, locale) {
        Some(rule) => rule.render(&query.to_lowercase()),
        None => table(locale).generic.to_string(),
    }
}

static PT: CannedTable = CannedTable {
    rules: &[
        CannedRule {
            topic: "greeting",
            triggers: &["bom dia", "boa tarde", "boa noite", "olá", "oi", "hey", "oiê"],
            template: Template::Greeting {
                salutations: &[
                    ("bom dia", "🌅 Bom dia"),
                    ("boa tarde", "☀️ Boa tarde"),
                    ("boa noite", "🌙 Boa noite"),
                ],
                default: "👋 Olá",
                body: "Bem-vindo a Belém, a porta de entrada da Amazônia! 🌿

Como posso te ajudar com informações sobre nossa bela cidade e a COP 30? Posso falar sobre pontos turísticos, restaurantes, hotéis, transporte ou qualquer coisa relacionada a Belém do Pará.

🗣️ **Dica**: Experimente perguntar \"O que fazer em Belém?\" ou \"Onde comer tacacá?\"",
            },
        },
        CannedRule {
            topic: "dining",
            triggers: &["almoç", "jantar", "restaurante", "comida", "comer", "fome", "prato"],
            template: Template::Text(
                "🍽️ **Melhores Restaurantes em Belém:**

🏪 **Mercado Ver-o-Peso**: Tacacá autêntico, açaí tradicional e pratos regionais
🌊 **Estação das Docas**: Restaurantes sofisticados com vista para o rio Guamá
🥥 **Point do Açaí**: O melhor açaí tradicional paraense (servido salgado!)
🏠 **Lá em Casa**: Culinária regional familiar e aconchegante
🦋 **Mangal das Garças**: Restaurantes em ambiente natural exuberante
🍤 **Camarão do Elias**: Especialista em frutos do mar amazônicos
🌮 **Remanso do Bosque**: Alta gastronomia paraense

💡 **Dica especial**: Experimente o tacacá no final da tarde para a experiência mais autêntica!",
            ),
        },
        CannedRule {
            topic: "lodging",
            triggers: &["hotel", "hospedagem", "dormir", "ficar", "pousada", "pernoitar"],
            template: Template::Text(
                "🏨 **Hospedagem em Belém para todos os orçamentos:**

⭐ **LUXO (R$ 300+/noite):**
• Grand Mercure Belém do Pará (Nazaré)
• Vila Galé Collection Amazônia (temática)
• Radisson Hotel Maiorana Jr (executivo)

🏛️ **HISTÓRICO/BOUTIQUE (R$ 200-300/noite):**
• Atrium Quinta de Pedras (casarão colonial)
• Hotel Grão Pará (centro histórico)

💰 **ECONÔMICO (R$ 100-200/noite):**
• Ibis Styles Belém (moderno)
• Bristol Umarizal Hotel (beira-rio)
• Beira Rio Hotel (vista panorâmica)

📍 **Melhores bairros**: Nazaré (elegante), Umarizal (central), Batista Campos (tranquilo)",
            ),
        },
        CannedRule {
            topic: "attractions",
            triggers: &["pontos turísticos", "visitar", "turismo", "atrações", "passear", "conhecer"],
            template: Template::Text(
                "🏛️ **Pontos Turísticos Imperdíveis em Belém:**

🏪 **Ver-o-Peso** (parada obrigatória): Maior feira ao ar livre da América Latina

🎭 **Theatro da Paz** (1878): Teatro histórico com arquitetura neoclássica

🦋 **Mangal das Garças**: Parque natural urbano com borboletário

🚢 **Estação das Docas**: Complexo gastronômico à beira-rio

⛪ **Basílica Santuário de Nazaré**: Marco religioso do Círio

🏛️ **Cidade Velha**: Centro histórico com arquitetura colonial portuguesa

🏞️ **Ilha do Combu**: Paraíso natural a 15 min de barco

🌳 **Praça Batista Campos**: Área verde para relaxar

🌺 **Parque da Residência**: Orquidário e anfiteatro

⏰ **Roteiro de 1 dia**: Ver-o-Peso (manhã) → Cidade Velha (tarde) → Estação das Docas (pôr do sol)",
            ),
        },
        CannedRule {
            topic: "cop30",
            triggers: &["cop 30", "cop30", "conferência", "clima", "sustentabilidade", "meio ambiente"],
            template: Template::Text(
                "🌍 **COP 30 - Belém 2025: A COP da Amazônia!**

A 30ª Conferência da ONU sobre Mudanças Climáticas será realizada em Belém!

🏗️ **Preparativos em andamento:**
• Novo centro de convenções no Hangar
• Infraestrutura sustentável ampliada
• Transporte público BRT expandido
• Hotéis com certificação eco-friendly

🌿 **Destaques únicos:**
• Primeira COP realizada na Amazônia
• Foco em soluções baseadas na natureza
• Programação cultural amazônica rica
• Turismo sustentável e responsável
• Participação de povos indígenas

📅 **Data**: Novembro de 2025
🎯 **Expectativa**: 40.000+ participantes de 190+ países",
            ),
        },
        CannedRule {
            topic: "transport",
            triggers: &["transporte", "como chegar", "ônibus", "táxi", "uber", "metro", "brt"],
            template: Template::Text(
                "🚌 **Transporte completo em Belém:**

🚍 **BRT Belém**: Sistema de trânsito rápido moderno

🚕 **Táxi/Uber/99**: Disponível 24h, use apps para mais segurança

🚴 **Bike Belém**: Estações de bicicletas compartilhadas

⛵ **Barcos**: Para Ilha do Combu (Terminal Ruy Barata, R$ 3)

✈️ **Aeroporto**: Val-de-Cans, 15km do centro (táxi ~R$ 50)

🚌 **Ônibus urbano**: Extensa rede, passagem R$ 4,30

💡 **Dicas práticas**:
• Use BRT para trajetos longos (mais rápido)
• À noite, prefira Uber/99 (mais seguro)
• Para COP 30, haverá linhas especiais gratuitas
• Apps úteis: Moovit, Google Maps",
            ),
        },
        CannedRule {
            topic: "safety",
            triggers: &["segurança", "cuidado", "perigo", "assalto", "roubo", "perigoso"],
            template: Template::Text(
                "🛡️ **Segurança em Belém - Guia Completo:**

⚠️ **Cuidados essenciais:**
• Não exiba objetos de valor (celular, joias)
• Evite andar sozinho após 20h
• Use transporte por app à noite
• Mantenha documentos em local seguro
• Prefira cartão a dinheiro em espécie

📱 **Emergências importantes:**
• Polícia Militar: 190
• SAMU (Ambulância): 192
• Bombeiros: 193
• Polícia Civil: 197

✅ **Áreas mais seguras:**
• Estação das Docas (policiamento)
• Mangal das Garças (área turística)
• Shopping centers (segurança privada)
• Hotéis da orla (movimento constante)
• Theatro da Paz (centro cultural)",
            ),
        },
        CannedRule {
            topic: "local_cuisine",
            triggers: &["açaí", "tacacá", "maniçoba", "culinária", "comida típica", "prato paraense"],
            template: Template::Text(
                "🥣 **Culinária Paraense Autêntica - Imperdíveis:**

🍇 **Açaí**: Servido SALGADO com farinha d'água, peixe frito ou charque (esqueça o doce!)
🍲 **Tacacá**: Caldo quente com tucumã, jambu (deixa a boca dormente) e camarão seco
🥘 **Maniçoba**: \"Feijoada paraense\" - folhas de mandioca cozidas por 7 dias com carnes
🦆 **Pato no Tucupi**: Prato especial para ocasiões festivas
🦀 **Caranguejo**: Especialidade das ilhas, melhor época: junho-novembro
🐟 **Pirarucu**: Peixe gigante da Amazônia, preparado assado
🥥 **Cupuaçu**: Fruta amazônica para sobremesas

📍 **Onde experimentar**: Ver-o-Peso (autêntico), Point do Açaí (tradicional), Lá em Casa (caseiro)",
            ),
        },
        CannedRule {
            topic: "climate",
            triggers: &["clima", "tempo", "chuva", "calor", "temperatura"],
            template: Template::Text(
                "🌤️ **Clima tropical de Belém:**

🌡️ **Temperatura**: 24°C a 32°C (ano todo, pouca variação)

☔ **Estação mais chuvosa**: Dezembro a Maio (chuvas diárias)

☀️ **Menos chuva**: Junho a Novembro (melhor época)

💧 **Umidade**: Sempre alta (80-85%)

🌪️ **Ventos**: Brisas constantes do rio

👕 **O que levar sempre:**
• Roupas leves, claras e respiráveis
• Protetor solar FPS 60+ (sol forte)
• Capa de chuva ou guarda-chuva compacto
• Repelente (mosquitos são comuns)
• Calçado antiderrapante para chuva

💡 **Dica local**: As chuvas são intensas mas passam rápido!",
            ),
        },
        CannedRule {
            topic: "shopping",
            triggers: &["compras", "shopping", "souvenirs", "lembranças", "artesanato"],
            template: Template::Text(
                "🛍️ **Compras e Souvenirs em Belém:**

🏪 **Ver-o-Peso**: Artesanato amazônico, ervas, temperos, cerâmica marajoara
🛒 **Shopping Pátio Belém**: Lojas nacionais, praça de alimentação
🎨 **Casa das Artes**: Artesanato local e regional
🌿 **Mercado de São Brás**: Produtos naturais e plantas medicinais

🎁 **Souvenirs autênticos:**
• Cerâmica marajoara (arte milenar)
• Joias com pedras amazônicas
• Redes de dormir tradicionais
• Açaí em pó ou polpa
• Cachaças artesanais regionais
• Óleos e essências amazônicas

💰 **Dica**: Sempre negocie o preço no Ver-o-Peso!",
            ),
        },
        CannedRule {
            topic: "nightlife",
            triggers: &["noite", "balada", "bar", "festa", "diversão noturna"],
            template: Template::Text(
                "🌃 **Vida Noturna em Belém:**

🍻 **Bares tradicionais:**
• Boteco Magnífico (chopp gelado)
• Bar do Parque (ambiente familiar)
• Cervejaria Belém (craft beer local)

🎶 **Música ao vivo:**
• Casa Tom (MPB e jazz)
• Estação das Docas (shows eventuais)
• Teatro Waldemar Henrique (cultura)

🏖️ **Orla de Icoaraci** (fins de semana):
• Barracas na praia
• Música regional (brega, carimbó)
• Ambiente descontraído

⚠️ **Segurança**: Sempre use Uber/táxi à noite e ande em grupo",
            ),
        },
        CannedRule {
            topic: "pricing",
            triggers: &["preço", "custa", "valor", "quanto", "barato", "caro"],
            template: Template::Text(
                "💰 **Custos em Belém (estimativas 2025):**

🍽️ **Alimentação:**
• Tacacá: R$ 8-12
• Almoço simples: R$ 25-35
• Restaurante bom: R$ 60-100/pessoa
• Açaí tradicional: R$ 15-25

🚌 **Transporte:**
• Ônibus urbano: R$ 4,30
• Uber (centro): R$ 15-30
• Táxi aeroporto: R$ 45-60
• Barco Ilha do Combu: R$ 3

🎫 **Atrações:**
• Theatro da Paz: R$ 10-40
• Mangal das Garças: R$ 15
• Museus: R$ 5-15
• Ver-o-Peso: Gratuito

💡 **Dica**: Belém é mais barata que capitais do Sul/Sudeste!",
            ),
        },
        CannedRule {
            topic: "duration",
            triggers: &["quantos dias", "tempo ficar", "roteiro", "itinerário"],
            template: Template::Text(
                "📅 **Roteiros para Belém:**

⚡ **2 dias (mínimo):**
• Dia 1: Ver-o-Peso + Cidade Velha + Estação das Docas
• Dia 2: Mangal das Garças + Theatro da Paz + Basílica

🌟 **4-5 dias (ideal):**
• + Ilha do Combu
• + Mercado de São Brás
• + Icoaraci (cerâmica)
• + Mais restaurantes locais

🏖️ **1 semana+ (completo):**
• + Salinópolis (praias)
• + Alter do Chão (Caribe Amazônico)
• + Marajó (búfalos)

💡 **Recomendação**: 4 dias é perfeito para conhecer bem a cidade!",
            ),
        },
    ],
    generic: "👋 **Olá! Sou o Oraculum AI** 🤖

Especialista em **Belém do Pará** e **COP 30**. Seu guia local inteligente!

🎯 **Perguntas populares que posso responder:**

🍽️ \"Onde almoçar em Belém?\"
🏨 \"Melhores hotéis da cidade\"
🏛️ \"O que visitar em 3 dias?\"
🌍 \"Como será a COP 30?\"
🚌 \"Como me locomover?\"
🛡️ \"Belém é segura?\"
🥣 \"O que é tacacá?\"
💰 \"Quanto custa viajar para cá?\"

💬 **Digite sua dúvida** e receba informações detalhadas e atualizadas sobre nossa bela cidade amazônica!",
};

static EN: CannedTable = CannedTable {
    rules: &[
        CannedRule {
            topic: "greeting",
            triggers: &["hello", "hi", "good morning", "good afternoon", "good evening"],
            template: Template::Text(
                "👋 Hello! Welcome to Belém, the gateway to the Amazon! 🌿

How can I help you with information about our beautiful city and COP 30? I can talk about tourist attractions, restaurants, hotels, transportation or anything related to Belém do Pará.

🗣️ **Tip**: Try asking \"What to do in Belém?\" or \"Where to eat tacacá?\"",
            ),
        },
        CannedRule {
            topic: "dining",
            triggers: &["lunch", "dinner", "restaurant", "food", "eat", "hungry"],
            template: Template::Text(
                "🍽️ **Best Restaurants in Belém:**

🏪 **Mercado Ver-o-Peso**: Authentic tacacá, traditional açaí and regional dishes
🌊 **Estação das Docas**: Sophisticated restaurants with river view
🥥 **Point do Açaí**: The best traditional Pará açaí (served salty!)
🏠 **Lá em Casa**: Regional family cuisine
🦋 **Mangal das Garças**: Restaurants in exuberant natural environment
🍤 **Camarão do Elias**: Amazon seafood specialist
🌮 **Remanso do Bosque**: High-end Pará cuisine

💡 **Special tip**: Try tacacá in the late afternoon for the most authentic experience!",
            ),
        },
    ],
    generic: "👋 **Hello! I'm Oraculum AI** 🤖

**Belém do Pará** and **COP 30** specialist. Your intelligent local guide!

🎯 **Popular questions I can answer:**

🍽️ \"Where to have lunch in Belém?\"
🏨 \"Best hotels in the city\"
🏛️ \"What to visit in 3 days?\"
🌍 \"How will COP 30 be?\"
🚌 \"How to get around?\"
🛡️ \"Is Belém safe?\"
🥣 \"What is tacacá?\"
💰 \"How much does it cost to travel here?\"

💬 **Type your question** and receive detailed and updated information about our beautiful Amazonian city!",
};

static ES: CannedTable = CannedTable {
    rules: &[
        CannedRule {
            topic: "greeting",
            triggers: &["hola", "buenos días", "buenas tardes", "buenas noches"],
            template: Template::Text(
                "👋 ¡Hola! ¡Bienvenido a Belém, la puerta de entrada al Amazonas! 🌿

¿Cómo puedo ayudarte con información sobre nuestra hermosa ciudad y la COP 30? Puedo hablar sobre atracciones turísticas, restaurantes, hoteles, transporte o cualquier cosa relacionada con Belém do Pará.

🗣️ **Consejo**: Intenta preguntar \"¿Qué hacer en Belém?\" o \"¿Dónde comer tacacá?\"",
            ),
        },
        CannedRule {
            topic: "dining",
            triggers: &["almuerzo", "cena", "restaurante", "comida", "comer", "hambre"],
            template: Template::Text(
                "🍽️ **Mejores Restaurantes en Belém:**

🏪 **Mercado Ver-o-Peso**: Tacacá auténtico, açaí tradicional y platos regionales
🌊 **Estação das Docas**: Restaurantes sofisticados con vista al río
🥥 **Point do Açaí**: ¡El mejor açaí tradicional de Pará (servido salado!)
🏠 **Lá em Casa**: Cocina regional familiar
🦋 **Mangal das Garças**: Restaurantes en ambiente natural exuberante
🍤 **Camarão do Elias**: Especialista en mariscos amazónicos
🌮 **Remanso do Bosque**: Alta cocina paraense

💡 **Consejo especial**: ¡Prueba el tacacá al final de la tarde para la experiencia más auténtica!",
            ),
        },
    ],
    generic: "👋 **¡Hola! Soy Oraculum AI** 🤖

Especialista en **Belém do Pará** y **COP 30**. ¡Tu guía local inteligente!

🎯 **Preguntas populares que puedo responder:**

🍽️ \"¿Dónde almorzar en Belém?\"
🏨 \"Mejores hoteles de la ciudad\"
🏛️ \"¿Qué visitar en 3 días?\"
🌍 \"¿Cómo será la COP 30?\"
🚌 \"¿Cómo moverse?\"
🛡️ \"¿Es seguro Belém?\"
🥣 \"¿Qué es el tacacá?\"
💰 \"¿Cuánto cuesta viajar aquí?\"

💬 **Escribe tu pregunta** y recibe información detallada y actualizada sobre nuestra hermosa ciudad amazónica!",
};
